use crate::common::{Operator, State, MAX_SIZE, MIN_SIZE};

use anyhow::{anyhow, bail, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use tracing::debug;

/// Parse one board per non-blank line, N*N whitespace separated tiles in row
/// major order. Without an explicit size, N is taken from the first board.
pub fn parse_boards(content: &str, size: Option<usize>) -> Result<Vec<State>> {
    let mut size = size;
    let mut boards = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let tiles = line
            .split_whitespace()
            .map(|token| token.parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .with_context(|| format!("line {line_number}: tiles must be integers"))?;

        let n = match size {
            Some(n) => n,
            None => {
                let n = infer_size(tiles.len()).ok_or_else(|| {
                    anyhow!(
                        "line {line_number}: {} tiles do not form a square board",
                        tiles.len()
                    )
                })?;
                debug!("board size {n} inferred from line {line_number}");
                size = Some(n);
                n
            }
        };
        if tiles.len() != n * n {
            bail!(
                "line {line_number}: expected {} tiles for a {n}x{n} board, found {}",
                n * n,
                tiles.len()
            );
        }

        let board = State::new(n, tiles).with_context(|| format!("line {line_number}"))?;
        boards.push(board);
    }

    Ok(boards)
}

fn infer_size(tiles: usize) -> Option<usize> {
    (MIN_SIZE..=MAX_SIZE).find(|n| n * n == tiles)
}

pub fn load_boards(path: &str, size: Option<usize>) -> Result<Vec<State>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read input file: {path}"))?;
    parse_boards(&content, size).with_context(|| format!("invalid input file: {path}"))
}

/// Whether `goal` is reachable from `state`.
///
/// A move transposes the blank with a neighbour, so the permutation taking
/// `state` to `goal` must have the same parity as the blank's taxicab
/// distance between the two boards.
pub fn is_solvable(state: &State, goal: &State) -> bool {
    if state.size() != goal.size() {
        return false;
    }

    let positions = goal.correct_positions();
    let targets: Vec<u8> = state
        .tiles()
        .iter()
        .map(|&tile| positions[tile as usize])
        .collect();
    let inversions: usize = targets
        .iter()
        .enumerate()
        .map(|(i, &target)| targets[i + 1..].iter().filter(|&&next| next < target).count())
        .sum();

    let (row, col) = state.blank();
    let (goal_row, goal_col) = goal.blank();
    let blank_distance = row.abs_diff(goal_row) + col.abs_diff(goal_col);

    inversions % 2 == blank_distance % 2
}

/// Random walk of `moves` blank moves from `goal`, never undoing the
/// previous move.
pub fn scramble<R: Rng>(goal: &State, moves: usize, rng: &mut R) -> State {
    let mut state = goal.clone();
    let mut previous: Option<Operator> = None;

    for _ in 0..moves {
        let candidates: Vec<(Operator, State)> = Operator::ALL
            .into_iter()
            .filter(|&operator| previous != Some(operator.reverse()))
            .filter_map(|operator| state.apply(operator).map(|next| (operator, next)))
            .collect();
        // Every cell has at least two neighbours, so one candidate survives.
        let Some((operator, next)) = candidates.choose(rng).cloned() else {
            break;
        };
        state = next;
        previous = Some(operator);
    }

    state
}

pub fn generate_boards(size: usize, moves: usize, count: usize, seed: u64) -> Result<Vec<State>> {
    let goal = State::goal(size)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count).map(|_| scramble(&goal, moves, &mut rng)).collect())
}
