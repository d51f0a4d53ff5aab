use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

pub const MIN_SIZE: usize = 2;
// Cell indices are stored as u8 in the correct-position table.
pub const MAX_SIZE: usize = 16;

/// Direction in which the blank slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    Up,
    Down,
    Left,
    Right,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Up, Operator::Down, Operator::Left, Operator::Right];

    pub fn reverse(self) -> Self {
        match self {
            Operator::Up => Operator::Down,
            Operator::Down => Operator::Up,
            Operator::Left => Operator::Right,
            Operator::Right => Operator::Left,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Up => "Up",
            Operator::Down => "Down",
            Operator::Left => "Left",
            Operator::Right => "Right",
        };
        write!(f, "{s}")
    }
}

/// An immutable N x N board, stored row-major. `0` is the blank.
#[derive(Clone)]
pub struct State {
    size: usize,
    tiles: Box<[u8]>,
    blank: usize,
    // Filled the first time the state is used as a heuristic target.
    correct_positions: OnceCell<Box<[u8]>>,
}

impl State {
    pub fn new(size: usize, tiles: Vec<u8>) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            bail!("board size must be between {MIN_SIZE} and {MAX_SIZE}, got {size}");
        }
        if tiles.len() != size * size {
            bail!(
                "a {size}x{size} board needs {} tiles, got {}",
                size * size,
                tiles.len()
            );
        }

        let mut seen = vec![false; tiles.len()];
        for &tile in &tiles {
            let tile = tile as usize;
            if tile >= tiles.len() {
                bail!("tile {tile} is out of range for a {size}x{size} board");
            }
            if seen[tile] {
                bail!("tile {tile} appears more than once");
            }
            seen[tile] = true;
        }

        let blank = tiles
            .iter()
            .position(|&tile| tile == 0)
            .ok_or_else(|| anyhow!("board has no blank tile"))?;

        Ok(State {
            size,
            tiles: tiles.into_boxed_slice(),
            blank,
            correct_positions: OnceCell::new(),
        })
    }

    /// Canonical goal: `1, 2, ..., N*N - 1` followed by the blank.
    pub fn goal(size: usize) -> Result<Self> {
        let cells = size * size;
        let tiles = (1..cells).chain(std::iter::once(0)).map(|tile| tile as u8).collect();
        State::new(size, tiles)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn tile(&self, row: usize, col: usize) -> u8 {
        self.tiles[row * self.size + col]
    }

    /// (row, col) of the blank.
    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Slide the blank one cell. `None` when the blank would leave the board.
    pub fn apply(&self, operator: Operator) -> Option<State> {
        let (row, col) = self.blank();
        let target = match operator {
            Operator::Up if row > 0 => self.blank - self.size,
            Operator::Down if row + 1 < self.size => self.blank + self.size,
            Operator::Left if col > 0 => self.blank - 1,
            Operator::Right if col + 1 < self.size => self.blank + 1,
            _ => return None,
        };

        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Some(State {
            size: self.size,
            tiles,
            blank: target,
            correct_positions: OnceCell::new(),
        })
    }

    /// Cell index of every tile in this state, indexed by tile value.
    pub(crate) fn correct_positions(&self) -> &[u8] {
        self.correct_positions.get_or_init(|| {
            let mut positions = vec![0u8; self.tiles.len()];
            for (cell, &tile) in self.tiles.iter().enumerate() {
                positions[tile as usize] = cell as u8;
            }
            positions.into_boxed_slice()
        })
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.tiles == other.tiles
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Base N*N keeps the polynomial collision free up to 4x4.
        let base = self.tiles.len() as u64;
        let hash = self
            .tiles
            .iter()
            .fold(0u64, |hash, &tile| hash.wrapping_mul(base).wrapping_add(tile as u64));
        state.write_u64(hash);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("size", &self.size)
            .field("tiles", &self.tiles)
            .finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.size) {
            for &tile in row {
                if tile == 0 {
                    write!(f, "[] ")?;
                } else {
                    write!(f, "{tile:2} ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
