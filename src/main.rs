use npuzzle_rust::common::State;
use npuzzle_rust::config::{Cli, Config};
use npuzzle_rust::puzzle::{generate_boards, is_solvable, load_boards};
use npuzzle_rust::report::{BoardReport, Report, RunRecord};
use npuzzle_rust::solver::solve;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let boards = match (&config.input_path, config.scramble) {
        (Some(input_path), _) => load_boards(input_path, config.size)?,
        (None, Some(moves)) => {
            let size = config.size.context("--scramble needs an explicit --size")?;
            generate_boards(size, moves, config.count, config.seed)?
        }
        (None, None) => bail!("either an input file or --scramble must be given"),
    };
    let Some(size) = boards.first().map(State::size) else {
        warn!("no boards to solve");
        return Ok(());
    };
    let goal = State::goal(size)?;
    info!("solving {} board(s) of size {size}", boards.len());

    let mut report = Report::new();
    for (index, initial) in boards.iter().enumerate() {
        info!("Solving input {index}:\n{initial}");
        let solvable = is_solvable(initial, &goal);
        let mut board_report = BoardReport::new(initial, solvable);
        if !solvable {
            warn!("board {index} cannot reach the goal, skipped");
            report.push(board_report);
            continue;
        }

        for &algorithm in &config.algorithms {
            for &heuristic in &config.heuristics {
                info!("{} with {}", algorithm.label(), heuristic.label());
                let search_config = config.search_config(algorithm, heuristic);
                let solution = match solve(algorithm, initial, &goal, &search_config) {
                    Ok(solution) => solution,
                    Err(err) => {
                        error!("{} failed on board {index}: {err:#}", algorithm.label());
                        None
                    }
                };
                if solution.is_none() {
                    error!("{} found no solution for board {index}", algorithm.label());
                }
                board_report.push(RunRecord::new(algorithm, heuristic, solution.as_ref()));
            }
        }
        report.push(board_report);
    }

    report.save_text(&config.output_path)?;
    info!("results written to {}", config.output_path);
    if let Some(json_path) = &config.json_path {
        report.save_json(json_path)?;
        info!("json results written to {json_path}");
    }

    Ok(())
}
