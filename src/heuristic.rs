//! Admissible distance estimates between two boards.
//!
//! Every estimate is computed against a target state, using the target's
//! cached correct-position table. The front-to-front variants evaluate a node
//! against every state of the opposing open list instead of a fixed endpoint.

use crate::common::{OpenList, State};
use crate::config::HeuristicKind;

impl State {
    pub fn manhattan_distance(&self, goal: &State) -> usize {
        let size = self.size();
        let positions = goal.correct_positions();

        self.tiles()
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != 0)
            .map(|(cell, &tile)| {
                let target = positions[tile as usize] as usize;
                (cell / size).abs_diff(target / size) + (cell % size).abs_diff(target % size)
            })
            .sum()
    }

    /// Manhattan distance plus the extra moves needed to resolve tiles that
    /// sit in their goal row (column) but in reversed order.
    pub fn linear_conflict(&self, goal: &State) -> usize {
        let size = self.size();
        let positions = goal.correct_positions();
        let target = |tile: u8| {
            let cell = positions[tile as usize] as usize;
            (cell / size, cell % size)
        };

        // Conflicts each cell takes part in, along its row and its column.
        let mut row_conflicts = vec![0usize; size * size];
        let mut col_conflicts = vec![0usize; size * size];

        for row in 0..size {
            for col in 0..size {
                let tile = self.tile(row, col);
                if tile == 0 {
                    continue;
                }
                let (goal_row, goal_col) = target(tile);

                if goal_row == row {
                    for k in col + 1..size {
                        let other = self.tile(row, k);
                        if other == 0 {
                            continue;
                        }
                        let (other_row, other_col) = target(other);
                        if other_row == row && other_col < goal_col {
                            row_conflicts[row * size + k] += 1;
                            row_conflicts[row * size + col] += 1;
                        }
                    }
                }

                if goal_col == col {
                    for k in row + 1..size {
                        let other = self.tile(k, col);
                        if other == 0 {
                            continue;
                        }
                        let (other_row, other_col) = target(other);
                        if other_col == col && other_row < goal_row {
                            col_conflicts[k * size + col] += 1;
                            col_conflicts[row * size + col] += 1;
                        }
                    }
                }
            }
        }

        // conflict_count[k]: cells in the line involved in k conflicts.
        let mut conflict_count = vec![0usize; size];
        let mut extra_moves = 0;
        for row in 0..size {
            conflict_count.fill(0);
            for col in 0..size {
                conflict_count[row_conflicts[row * size + col]] += 1;
            }
            extra_moves += moves_for_conflicts(size, &conflict_count);
        }
        for col in 0..size {
            conflict_count.fill(0);
            for row in 0..size {
                conflict_count[col_conflicts[row * size + col]] += 1;
            }
            extra_moves += moves_for_conflicts(size, &conflict_count);
        }

        extra_moves + self.manhattan_distance(goal)
    }

    pub fn h(&self, goal: &State, heuristic: HeuristicKind) -> usize {
        match heuristic {
            HeuristicKind::Manhattan => self.manhattan_distance(goal),
            HeuristicKind::LinearConflict => self.linear_conflict(goal),
        }
    }
}

/// Extra moves for one row or column, keyed by how many of its cells take
/// part in 0, 1, 2, ... conflicts.
pub(crate) fn moves_for_conflicts(size: usize, conflict_count: &[usize]) -> usize {
    if conflict_count[0] == size {
        return 0;
    }

    match size {
        4 => {
            if conflict_count[3] == 4 {
                // 4321
                6
            } else if (conflict_count[1] == 2 && conflict_count[2] != 2) || conflict_count[1] == 3
            {
                // 1243, 1324, 1342, 1423, 2134, 2314, 2341, 3124, 4123
                2
            } else {
                4
            }
        }
        3 => {
            if conflict_count[2] == 3 {
                // 321
                4
            } else {
                2
            }
        }
        // At least one tile has to leave the line.
        _ => 2,
    }
}

/// `min(h(state, m) + g(m))` over every entry `m` of the opposing open list.
pub(crate) fn front_to_front(
    state: &State,
    opposing: &OpenList,
    heuristic: HeuristicKind,
) -> Option<usize> {
    opposing
        .iter()
        .map(|entry| state.h(&entry.state, heuristic) + entry.g)
        .min()
}

/// Same as [`front_to_front`], scanning the opposing list in priority order
/// and stopping at the first entry whose f exceeds `best + g + 1`.
pub(crate) fn front_to_front_early_stop(
    state: &State,
    g: usize,
    opposing: &OpenList,
    heuristic: HeuristicKind,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for entry in opposing.iter() {
        let value = state.h(&entry.state, heuristic) + entry.g;
        let bound = best.map_or(value, |best| best.min(value));
        best = Some(bound);
        if entry.f > bound + g + 1 {
            break;
        }
    }
    best
}
