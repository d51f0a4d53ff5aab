use super::{finish_bidirectional, successors, Direction, Meeting};
use crate::common::{Frontier, NodeArena, OpenEntry, State};
use crate::config::{DuplicatePolicy, SearchConfig};
use crate::solver::Solution;
use crate::stat::Stats;

use std::cmp::max;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Two A* searches, from the initial state and from the goal, each ordered
/// by its own f. The side with the smaller open list is expanded next.
#[instrument(skip_all, name = "bidirectional_a_star", fields(size = initial.size(), heuristic = ?config.heuristic), level = "debug")]
pub(crate) fn bidirectional_a_star_search(
    initial: &State,
    goal: &State,
    config: &SearchConfig,
) -> Option<Solution> {
    let initial = Rc::new(initial.clone());
    let goal = Rc::new(goal.clone());

    let mut arena = NodeArena::new();
    let mut stats = Stats::default();

    let forward_h = initial.h(&goal, config.heuristic);
    let forward_root = arena.root(Rc::clone(&initial), forward_h);
    if initial == goal {
        stats.open_nodes = 1;
        return Some(Solution::new(arena, forward_root, stats));
    }
    let backward_h = goal.h(&initial, config.heuristic);
    let backward_root = arena.root(Rc::clone(&goal), backward_h);

    let mut forward = Frontier::new();
    let mut backward = Frontier::new();
    forward.open.insert(OpenEntry {
        priority: forward_h,
        f: forward_h,
        g: 0,
        id: forward_root,
        state: Rc::clone(&initial),
    });
    backward.open.insert(OpenEntry {
        priority: backward_h,
        f: backward_h,
        g: 0,
        id: backward_root,
        state: Rc::clone(&goal),
    });

    let mut best: Option<Meeting> = None;

    loop {
        let (Some(forward_f_min), Some(backward_f_min)) =
            (forward.open.min_f(), backward.open.min_f())
        else {
            debug!("a frontier is exhausted");
            break;
        };

        // No undiscovered path can be cheaper than either side's f min.
        if let Some(meeting) = best {
            if meeting.cost <= max(forward_f_min, backward_f_min) {
                debug!("stop with cost {:?}", meeting.cost);
                break;
            }
        }

        let direction = if forward.open.len() <= backward.open.len() {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let (this, other, target) = match direction {
            Direction::Forward => (&mut forward, &backward, &goal),
            Direction::Backward => (&mut backward, &forward, &initial),
        };

        let Some(current) = this.open.pop_first() else {
            break;
        };
        trace!("expand {direction:?} node: {:?} f {:?}", current.id, current.f);
        stats.record_expansion(current.g);
        this.closed.insert(Rc::clone(&current.state), current.id);

        let tentative_g_cost = current.g + 1;
        for (operator, next) in successors(&current.state, direction) {
            if this.closed.contains(&next) {
                continue;
            }

            let h = match this.open.get(&next) {
                None => next.h(target, config.heuristic),
                Some(old)
                    if config.open_duplicates == DuplicatePolicy::KeepCheaper
                        && tentative_g_cost < old.g =>
                {
                    old.f - old.g
                }
                Some(_) => continue,
            };

            let next = Rc::new(next);
            let id = arena.child(current.id, Rc::clone(&next), operator, h);
            this.open.insert(OpenEntry {
                priority: tentative_g_cost + h,
                f: tentative_g_cost + h,
                g: tentative_g_cost,
                id,
                state: Rc::clone(&next),
            });

            if let Some(other_id) = other.find(&next) {
                Meeting::update(&mut best, &arena, direction, id, other_id);
            }
        }
    }

    finish_bidirectional(arena, &forward, &backward, best, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::a_star_search;
    use crate::common::Operator;
    use crate::config::{DuplicatePolicy, HeuristicKind};

    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn scrambled(size: usize, moves: usize, rng: &mut StdRng) -> State {
        let mut state = State::goal(size).unwrap();
        for _ in 0..moves {
            let operator = *Operator::ALL.choose(rng).unwrap();
            if let Some(next) = state.apply(operator) {
                state = next;
            }
        }
        state
    }

    fn keep_cheaper(heuristic: HeuristicKind) -> SearchConfig {
        SearchConfig::new(heuristic).with_open_duplicates(DuplicatePolicy::KeepCheaper)
    }

    #[test]
    fn test_bidirectional_initial_is_goal() {
        let goal = State::goal(4).unwrap();
        let solution =
            bidirectional_a_star_search(&goal, &goal, &SearchConfig::default()).unwrap();
        assert_eq!(solution.depth(), 0);
    }

    #[test]
    fn test_bidirectional_matches_a_star() {
        let mut rng = StdRng::seed_from_u64(42);
        let goal = State::goal(3).unwrap();
        for _ in 0..10 {
            let initial = scrambled(3, 40, &mut rng);
            for heuristic in HeuristicKind::ALL {
                let config = keep_cheaper(heuristic);
                let expected = a_star_search(&initial, &goal, &config).unwrap().depth();
                let solution = bidirectional_a_star_search(&initial, &goal, &config).unwrap();
                assert_eq!(solution.depth(), expected, "{initial}");
            }
        }
    }

    #[test]
    fn test_bidirectional_hardest_8_puzzle() {
        let goal = State::goal(3).unwrap();
        let initial = State::new(3, vec![8, 6, 7, 2, 5, 4, 3, 0, 1]).unwrap();
        let config = keep_cheaper(HeuristicKind::LinearConflict);
        let solution = bidirectional_a_star_search(&initial, &goal, &config).unwrap();
        assert_eq!(solution.depth(), 31);

        let replayed = solution
            .moves()
            .into_iter()
            .try_fold(initial.clone(), |state, operator| state.apply(operator))
            .unwrap();
        assert_eq!(replayed, goal);
    }

    #[test]
    fn test_bidirectional_reports_both_frontiers() {
        let goal = State::goal(3).unwrap();
        let initial = State::new(3, vec![4, 1, 3, 7, 2, 6, 0, 5, 8]).unwrap();
        let config = keep_cheaper(HeuristicKind::Manhattan);
        let solution = bidirectional_a_star_search(&initial, &goal, &config).unwrap();
        assert_eq!(solution.depth(), 6);
        assert!(solution.stats.closed_nodes >= 2);
        assert!(solution.stats.expanded_nodes >= solution.stats.closed_nodes);
    }

    #[test]
    fn test_bidirectional_unsolvable_exhausts() {
        let goal = State::goal(2).unwrap();
        let initial = State::new(2, vec![2, 1, 3, 0]).unwrap();
        assert!(bidirectional_a_star_search(&initial, &goal, &SearchConfig::default()).is_none());
    }
}
