use crate::algorithm::{a_star_search, bidirectional_a_star_search, mm_search};
use crate::common::{NodeArena, NodeId, Operator, SearchNode, State};
use crate::config::{MmVariant, SearchConfig};
use crate::stat::Stats;

use anyhow::bail;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

pub trait Solver {
    fn solve(&mut self, initial: &State, goal: &State) -> Option<Solution>;
}

/// A finished search: the node arena and the node holding the goal state.
#[derive(Debug)]
pub struct Solution {
    arena: NodeArena,
    goal: NodeId,
    pub stats: Stats,
}

impl Solution {
    pub(crate) fn new(arena: NodeArena, goal: NodeId, mut stats: Stats) -> Self {
        stats.depth = arena[goal].depth();
        Solution { arena, goal, stats }
    }

    pub fn depth(&self) -> usize {
        self.arena[self.goal].depth()
    }

    pub fn goal_node(&self) -> &SearchNode {
        &self.arena[self.goal]
    }

    /// Moves of the blank from the initial state to the goal.
    pub fn moves(&self) -> Vec<Operator> {
        self.arena
            .path_to(self.goal)
            .into_iter()
            .filter_map(|id| self.arena[id].operator)
            .collect()
    }

    /// Every state on the path, initial state first.
    pub fn states(&self) -> Vec<&State> {
        self.arena
            .path_to(self.goal)
            .into_iter()
            .map(|id| &*self.arena[id].state)
            .collect()
    }
}

pub struct AStar {
    config: SearchConfig,
}

impl AStar {
    pub fn new(config: SearchConfig) -> Self {
        AStar { config }
    }
}

impl Solver for AStar {
    fn solve(&mut self, initial: &State, goal: &State) -> Option<Solution> {
        a_star_search(initial, goal, &self.config)
    }
}

pub struct BiAStar {
    config: SearchConfig,
}

impl BiAStar {
    pub fn new(config: SearchConfig) -> Self {
        BiAStar { config }
    }
}

impl Solver for BiAStar {
    fn solve(&mut self, initial: &State, goal: &State) -> Option<Solution> {
        bidirectional_a_star_search(initial, goal, &self.config)
    }
}

pub struct MM {
    config: SearchConfig,
}

impl MM {
    pub fn new(config: SearchConfig) -> Self {
        MM { config }
    }
}

impl Solver for MM {
    fn solve(&mut self, initial: &State, goal: &State) -> Option<Solution> {
        mm_search(initial, goal, &self.config)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum Algorithm {
    #[serde(rename = "bidi-astar")]
    #[value(name = "bidi-astar")]
    BidirectionalAStar,
    #[serde(rename = "astar")]
    #[value(name = "astar")]
    AStar,
    #[serde(rename = "mm")]
    #[value(name = "mm")]
    Mm,
    #[serde(rename = "mm-f2f")]
    #[value(name = "mm-f2f")]
    MmF2f,
    #[serde(rename = "mm-f2f-ec")]
    #[value(name = "mm-f2f-ec")]
    MmF2fEc,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::BidirectionalAStar,
        Algorithm::AStar,
        Algorithm::Mm,
        Algorithm::MmF2f,
        Algorithm::MmF2fEc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::BidirectionalAStar => "bidirectional A*",
            Algorithm::AStar => "A*",
            Algorithm::Mm => "MM",
            Algorithm::MmF2f => "MMf2f",
            Algorithm::MmF2fEc => "MMf2fEC",
        }
    }

    /// The MM family fixes its own variant; other algorithms ignore it.
    pub fn configure(&self, config: SearchConfig) -> SearchConfig {
        match self {
            Algorithm::Mm => config.with_mm_variant(MmVariant::Classic),
            Algorithm::MmF2f => config.with_mm_variant(MmVariant::FrontToFront),
            Algorithm::MmF2fEc => config.with_mm_variant(MmVariant::FrontToFrontEarlyStop),
            Algorithm::BidirectionalAStar | Algorithm::AStar => config,
        }
    }

    pub fn solver(&self, config: SearchConfig) -> Box<dyn Solver> {
        let config = self.configure(config);
        match self {
            Algorithm::BidirectionalAStar => Box::new(BiAStar::new(config)),
            Algorithm::AStar => Box::new(AStar::new(config)),
            Algorithm::Mm | Algorithm::MmF2f | Algorithm::MmF2fEc => Box::new(MM::new(config)),
        }
    }
}

/// Run one search. `Ok(None)` means the search space was exhausted.
pub fn solve(
    algorithm: Algorithm,
    initial: &State,
    goal: &State,
    config: &SearchConfig,
) -> anyhow::Result<Option<Solution>> {
    if initial.size() != goal.size() {
        bail!(
            "initial board is {0}x{0} but the goal is {1}x{1}",
            initial.size(),
            goal.size()
        );
    }

    let solve_start_time = Instant::now();
    let mut solver = algorithm.solver(*config);
    let mut solution = solver.solve(initial, goal);

    if let Some(solution) = solution.as_mut() {
        solution.stats.time_us = solve_start_time.elapsed().as_micros() as usize;
        solution.stats.print();
    } else {
        debug!("{} found no solution", algorithm.label());
    }
    Ok(solution)
}
