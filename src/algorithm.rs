mod astar;
mod biastar;
mod mm;

pub(crate) use astar::a_star_search;
pub(crate) use biastar::bidirectional_a_star_search;
pub(crate) use mm::mm_search;

use crate::common::{Frontier, NodeArena, NodeId, Operator, State};
use crate::solver::Solution;
use crate::stat::Stats;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

/// Neighbours of `state` in the given direction, paired with the forward
/// move that connects them. Backward successors are predecessors: applying
/// the returned operator to them yields `state`.
fn successors(state: &State, direction: Direction) -> impl Iterator<Item = (Operator, State)> + '_ {
    Operator::ALL.into_iter().filter_map(move |operator| {
        let blank_move = match direction {
            Direction::Forward => operator,
            Direction::Backward => operator.reverse(),
        };
        state.apply(blank_move).map(|next| (operator, next))
    })
}

/// Cheapest known connection between the two searches.
#[derive(Debug, Clone, Copy)]
struct Meeting {
    cost: usize,
    forward: NodeId,
    backward: NodeId,
}

impl Meeting {
    /// Record `node` (just generated in `direction`) meeting `other`, a node of
    /// the opposite search holding the same state, if it improves `best`.
    fn update(
        best: &mut Option<Meeting>,
        arena: &NodeArena,
        direction: Direction,
        node: NodeId,
        other: NodeId,
    ) {
        let cost = arena[node].g + arena[other].g;
        if best.is_some_and(|meeting| meeting.cost <= cost) {
            return;
        }
        let (forward, backward) = match direction {
            Direction::Forward => (node, other),
            Direction::Backward => (other, node),
        };
        debug!("meeting with cost {cost:?}");
        *best = Some(Meeting {
            cost,
            forward,
            backward,
        });
    }
}

/// Turn the best meeting of a bidirectional search into a solution.
fn finish_bidirectional(
    mut arena: NodeArena,
    forward: &Frontier,
    backward: &Frontier,
    best: Option<Meeting>,
    mut stats: Stats,
) -> Option<Solution> {
    stats.open_nodes = forward.open.len() + backward.open.len();
    stats.closed_nodes = forward.closed.len() + backward.closed.len();

    let meeting = best?;
    let goal = arena.splice(meeting.forward, meeting.backward);
    Some(Solution::new(arena, goal, stats))
}
