mod frontier;
mod node;
mod state;

pub use frontier::{ClosedList, Frontier, OpenEntry, OpenList};
pub use node::{NodeArena, NodeId, SearchNode};
pub use state::{Operator, State, MAX_SIZE, MIN_SIZE};
