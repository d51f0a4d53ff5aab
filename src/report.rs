use crate::common::{Operator, State};
use crate::config::HeuristicKind;
use crate::solver::{Algorithm, Solution};
use crate::stat::Stats;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};

const HEADER: &str = "--------------------- Tile Puzzle Results ---------------------";
const RULE: &str = "------------------------------------------------------";
const SHORT_RULE: &str = "------------------------------";
const BOARD_RULE: &str = "========================";

/// One cell of the algorithm x heuristic matrix.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub algorithm: Algorithm,
    pub heuristic: HeuristicKind,
    /// `None` when the search exhausted without a solution.
    pub stats: Option<Stats>,
    pub moves: Option<Vec<Operator>>,
}

impl RunRecord {
    pub fn new(
        algorithm: Algorithm,
        heuristic: HeuristicKind,
        solution: Option<&Solution>,
    ) -> Self {
        RunRecord {
            algorithm,
            heuristic,
            stats: solution.map(|solution| solution.stats.clone()),
            moves: solution.map(Solution::moves),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardReport {
    #[serde(skip)]
    initial: State,
    pub size: usize,
    pub tiles: Vec<u8>,
    pub solvable: bool,
    pub runs: Vec<RunRecord>,
}

impl BoardReport {
    pub fn new(initial: &State, solvable: bool) -> Self {
        BoardReport {
            initial: initial.clone(),
            size: initial.size(),
            tiles: initial.tiles().to_vec(),
            solvable,
            runs: Vec::new(),
        }
    }

    pub fn push(&mut self, run: RunRecord) {
        self.runs.push(run);
    }

    fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "Initial state: \n{}\n{BOARD_RULE}\n", self.initial)?;
        if !self.solvable {
            writeln!(writer, "Board cannot reach the goal, skipped!")?;
        }

        // Runs arrive grouped by algorithm, heuristics in order within each.
        let mut current: Option<Algorithm> = None;
        for run in &self.runs {
            if current != Some(run.algorithm) {
                write!(
                    writer,
                    "\n{RULE}\nSolving tile puzzle using {}\n{SHORT_RULE}\n",
                    run.algorithm.label()
                )?;
                current = Some(run.algorithm);
            }
            write!(writer, "Heuristic: {}\n{SHORT_RULE}\n", run.heuristic.label())?;
            match &run.stats {
                Some(stats) => {
                    writeln!(writer, "Found path: depth:{}", stats.depth)?;
                    writeln!(
                        writer,
                        "Nodes Generated: {} ({} open/{} closed)",
                        stats.generated_nodes(),
                        stats.open_nodes,
                        stats.closed_nodes
                    )?;
                    writeln!(writer, "Run time: {} ms", stats.time_us / 1000)?;
                }
                None => writeln!(writer, "No solution Found!")?,
            }
            write!(writer, "\n{RULE}\n")?;
        }
        write!(writer, "\n\n\n")
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub boards: Vec<BoardReport>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, board: BoardReport) {
        self.boards.push(board);
    }

    pub fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{HEADER}")?;
        for board in &self.boards {
            board.write_text(writer)?;
        }
        Ok(())
    }

    pub fn render_text(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_text(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn save_text(&self, path: &str) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("cannot create report file: {path}"))?;
        let mut writer = BufWriter::new(file);
        self.write_text(&mut writer)
            .and_then(|_| writer.flush())
            .with_context(|| format!("cannot write report file: {path}"))
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("cannot create json report: {path}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("cannot write json report: {path}"))
    }
}
