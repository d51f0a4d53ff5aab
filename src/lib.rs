pub mod common;
pub mod config;
pub mod heuristic;
pub mod puzzle;
pub mod report;
pub mod solver;
pub mod stat;

mod algorithm;
