use crate::common::{MAX_SIZE, MIN_SIZE};
use crate::solver::Algorithm;

use anyhow::{anyhow, bail};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    #[default]
    #[value(name = "linear-conflict")]
    LinearConflict,
    #[value(name = "manhattan")]
    Manhattan,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 2] = [HeuristicKind::LinearConflict, HeuristicKind::Manhattan];

    pub fn label(&self) -> &'static str {
        match self {
            HeuristicKind::LinearConflict => "linearConflict",
            HeuristicKind::Manhattan => "manhattanDistance",
        }
    }
}

/// How MM evaluates h for a newly generated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MmVariant {
    /// Against the fixed opposite endpoint.
    #[default]
    Classic,
    /// Minimum over the opposing open list.
    FrontToFront,
    /// Front-to-front, stopping the scan once no entry can improve the bound.
    FrontToFrontEarlyStop,
}

/// What A* does when it generates a state that is already open.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first node found for the state and never re-examine it.
    #[default]
    #[value(name = "keep-first")]
    KeepFirst,
    /// Re-parent the open node when a strictly smaller g is found.
    #[value(name = "keep-cheaper")]
    KeepCheaper,
}

/// Per-search configuration, passed by value into every search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub heuristic: HeuristicKind,
    pub mm_variant: MmVariant,
    pub open_duplicates: DuplicatePolicy,
}

impl SearchConfig {
    pub fn new(heuristic: HeuristicKind) -> Self {
        SearchConfig {
            heuristic,
            ..Default::default()
        }
    }

    pub fn with_mm_variant(mut self, mm_variant: MmVariant) -> Self {
        self.mm_variant = mm_variant;
        self
    }

    pub fn with_open_duplicates(mut self, open_duplicates: DuplicatePolicy) -> Self {
        self.open_duplicates = open_duplicates;
        self
    }

    /// Build a config from the three boolean run flags. At most one
    /// front-to-front flag may be set.
    pub fn from_flags(
        use_linear_conflict: bool,
        use_front_to_front: bool,
        use_front_to_front_early_termination: bool,
    ) -> anyhow::Result<Self> {
        let heuristic = if use_linear_conflict {
            HeuristicKind::LinearConflict
        } else {
            HeuristicKind::Manhattan
        };
        let mm_variant = match (use_front_to_front, use_front_to_front_early_termination) {
            (false, false) => MmVariant::Classic,
            (true, false) => MmVariant::FrontToFront,
            (false, true) => MmVariant::FrontToFrontEarlyStop,
            (true, true) => {
                return Err(anyhow!(
                    "front-to-front and front-to-front early termination are mutually exclusive"
                ))
            }
        };
        Ok(SearchConfig::new(heuristic).with_mm_variant(mm_variant))
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "Rust N-Puzzle",
    about = "Sliding-tile puzzle search (A*, bidirectional A*, MM) implemented in Rust.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the input file, one board per line")]
    pub input_path: Option<String>,

    #[arg(long, help = "Board size, inferred from the first board when omitted")]
    pub size: Option<usize>,

    #[arg(long, help = "Path to the text report")]
    pub output_path: Option<String>,

    #[arg(long, help = "Path to an additional JSON report")]
    pub json_path: Option<String>,

    #[arg(
        long,
        value_enum,
        help = "Algorithms to run",
        use_value_delimiter = true
    )]
    pub algorithms: Vec<Algorithm>,

    #[arg(
        long,
        value_enum,
        help = "Heuristics to run",
        use_value_delimiter = true
    )]
    pub heuristics: Vec<HeuristicKind>,

    #[arg(long, value_enum, help = "A* handling of already-open states")]
    pub open_duplicates: Option<DuplicatePolicy>,

    #[arg(long, help = "Generate boards by a random walk of this many moves")]
    pub scramble: Option<usize>,

    #[arg(long, help = "Number of boards to generate with --scramble")]
    pub count: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: Option<String>,
    pub size: Option<usize>,
    pub output_path: String,
    pub json_path: Option<String>,
    pub algorithms: Vec<Algorithm>,
    pub heuristics: Vec<HeuristicKind>,
    pub open_duplicates: DuplicatePolicy,
    pub scramble: Option<usize>,
    pub count: usize,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: None,
            size: None,
            output_path: "results.txt".to_string(),
            json_path: None,
            algorithms: Algorithm::ALL.to_vec(),
            heuristics: HeuristicKind::ALL.to_vec(),
            open_duplicates: DuplicatePolicy::default(),
            scramble: None,
            count: 1,
            seed: 0,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(input_path) = &cli.input_path {
            self.input_path = Some(input_path.clone());
        }
        if let Some(size) = cli.size {
            self.size = Some(size);
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = output_path.clone();
        }
        if let Some(json_path) = &cli.json_path {
            self.json_path = Some(json_path.clone());
        }
        if !cli.algorithms.is_empty() {
            self.algorithms = cli.algorithms.clone();
        }
        if !cli.heuristics.is_empty() {
            self.heuristics = cli.heuristics.clone();
        }
        if let Some(open_duplicates) = cli.open_duplicates {
            self.open_duplicates = open_duplicates;
        }
        if let Some(scramble) = cli.scramble {
            self.scramble = Some(scramble);
        }
        if let Some(count) = cli.count {
            self.count = count;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match (&self.input_path, self.scramble) {
            (None, None) => bail!("either an input file or --scramble must be given"),
            (Some(_), Some(_)) => bail!("an input file and --scramble cannot be combined"),
            (None, Some(_)) if self.size.is_none() => {
                bail!("--scramble needs an explicit --size")
            }
            _ => {}
        }

        if let Some(size) = self.size {
            if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
                return Err(anyhow!(
                    "Board size must be between {MIN_SIZE} and {MAX_SIZE}, got {size}"
                ));
            }
        }
        if self.scramble.is_some() && self.count == 0 {
            bail!("--count must be at least 1");
        }
        if self.algorithms.is_empty() {
            bail!("no algorithm selected");
        }
        if self.heuristics.is_empty() {
            bail!("no heuristic selected");
        }
        Ok(())
    }

    /// Search config for one cell of the algorithm x heuristic matrix.
    pub fn search_config(&self, algorithm: Algorithm, heuristic: HeuristicKind) -> SearchConfig {
        algorithm.configure(SearchConfig::new(heuristic).with_open_duplicates(self.open_duplicates))
    }
}
