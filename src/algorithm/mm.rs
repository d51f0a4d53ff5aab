use super::{finish_bidirectional, successors, Direction, Meeting};
use crate::common::{Frontier, NodeArena, OpenEntry, State};
use crate::config::{MmVariant, SearchConfig};
use crate::heuristic::{front_to_front, front_to_front_early_stop};
use crate::solver::Solution;
use crate::stat::Stats;

use std::cmp::{max, min};
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// MM priority: `max(f, 2g)`.
fn priority(g: usize, h: usize) -> usize {
    max(g + h, 2 * g)
}

fn open_entry(arena: &NodeArena, id: usize) -> OpenEntry {
    let node = &arena[id];
    OpenEntry {
        priority: priority(node.g, node.h),
        f: node.f(),
        g: node.g,
        id,
        state: Rc::clone(&node.state),
    }
}

/// Meet-in-the-middle bidirectional search.
///
/// Both directions are ordered by `max(f, 2g)` and the side with the smaller
/// minimum priority is expanded. Search stops once the best meeting cost is
/// no larger than `max(C, fmin_f, fmin_b, gmin_f + gmin_b + 1)` where `C` is
/// the smaller of the two minimum priorities.
#[instrument(skip_all, name = "mm", fields(size = initial.size(), heuristic = ?config.heuristic, variant = ?config.mm_variant), level = "debug")]
pub(crate) fn mm_search(initial: &State, goal: &State, config: &SearchConfig) -> Option<Solution> {
    let initial = Rc::new(initial.clone());
    let goal = Rc::new(goal.clone());

    let mut arena = NodeArena::new();
    let mut stats = Stats::default();

    // The opposing frontier only holds its root at this point, so every
    // variant starts from the fixed-endpoint estimate.
    let forward_root = arena.root(Rc::clone(&initial), initial.h(&goal, config.heuristic));
    if initial == goal {
        stats.open_nodes = 1;
        return Some(Solution::new(arena, forward_root, stats));
    }
    let backward_root = arena.root(Rc::clone(&goal), goal.h(&initial, config.heuristic));

    let mut forward = Frontier::new();
    let mut backward = Frontier::new();
    forward.open.insert(open_entry(&arena, forward_root));
    backward.open.insert(open_entry(&arena, backward_root));

    let mut best: Option<Meeting> = None;

    loop {
        let (Some(forward_priority), Some(backward_priority)) =
            (forward.open.min_priority(), backward.open.min_priority())
        else {
            debug!("a frontier is exhausted");
            break;
        };

        if let Some(meeting) = best {
            let c = min(forward_priority, backward_priority);
            let f_bound = max(
                forward.open.min_f().unwrap_or(0),
                backward.open.min_f().unwrap_or(0),
            );
            let g_bound = forward.open.min_g().unwrap_or(0)
                + backward.open.min_g().unwrap_or(0)
                + 1;
            if meeting.cost <= max(c, max(f_bound, g_bound)) {
                debug!("stop with cost {:?}", meeting.cost);
                break;
            }
        }

        let direction = if forward_priority <= backward_priority {
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
        trace!(
            "expand {direction:?} node: {:?} priority {:?}",
            current.id,
            current.priority
        );
        stats.record_expansion(current.g);
        this.closed.insert(Rc::clone(&current.state), current.id);

        let tentative_g_cost = current.g + 1;
        for (operator, next) in successors(&current.state, direction) {
            // Keep an existing node unless this path is strictly cheaper,
            // in which case it is dropped and the state reopened.
            if let Some(existing) = this.find(&next) {
                if arena[existing].g <= tentative_g_cost {
                    continue;
                }
                this.open.remove(&next);
                this.closed.remove(&next);
            }

            let h = match config.mm_variant {
                MmVariant::Classic => None,
                MmVariant::FrontToFront => front_to_front(&next, &other.open, config.heuristic),
                MmVariant::FrontToFrontEarlyStop => front_to_front_early_stop(
                    &next,
                    tentative_g_cost,
                    &other.open,
                    config.heuristic,
                ),
            }
            .unwrap_or_else(|| next.h(target, config.heuristic));

            let next = Rc::new(next);
            let id = arena.child(current.id, Rc::clone(&next), operator, h);
            this.open.insert(open_entry(&arena, id));

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
    use crate::algorithm::{a_star_search, bidirectional_a_star_search};
    use crate::common::Operator;
    use crate::config::{DuplicatePolicy, HeuristicKind};

    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use tracing::info;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .try_init();
    }

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

    // Reference runs re-parent open states so A* depths are optimal.
    fn optimal(heuristic: HeuristicKind) -> SearchConfig {
        SearchConfig::new(heuristic).with_open_duplicates(DuplicatePolicy::KeepCheaper)
    }

    fn replay(initial: &State, moves: &[Operator]) -> Option<State> {
        moves
            .iter()
            .try_fold(initial.clone(), |state, &operator| state.apply(operator))
    }

    #[test]
    fn test_priority() {
        assert_eq!(priority(0, 7), 7);
        assert_eq!(priority(3, 4), 7);
        assert_eq!(priority(5, 2), 10);
    }

    #[test]
    fn test_mm_initial_is_goal() {
        let goal = State::goal(3).unwrap();
        let solution = mm_search(&goal, &goal, &SearchConfig::default()).unwrap();
        assert_eq!(solution.depth(), 0);
    }

    #[test]
    fn test_mm_matches_a_star() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(2024);
        let goal = State::goal(3).unwrap();
        for _ in 0..10 {
            let initial = scrambled(3, 40, &mut rng);
            for heuristic in HeuristicKind::ALL {
                let config = optimal(heuristic);
                let expected = a_star_search(&initial, &goal, &config).unwrap().depth();
                let solution = mm_search(&initial, &goal, &config).unwrap();
                assert_eq!(solution.depth(), expected, "{initial}");
                assert_eq!(replay(&initial, &solution.moves()), Some(goal.clone()));
            }
        }
    }

    #[test]
    fn test_mm_hardest_8_puzzle() {
        let goal = State::goal(3).unwrap();
        let initial = State::new(3, vec![6, 4, 7, 8, 5, 0, 3, 2, 1]).unwrap();
        let solution = mm_search(
            &initial,
            &goal,
            &SearchConfig::new(HeuristicKind::LinearConflict),
        )
        .unwrap();
        assert_eq!(solution.depth(), 31);
    }

    #[test]
    fn test_mm_15_puzzle() {
        let goal = State::goal(4).unwrap();
        let initial = [
            Operator::Left,
            Operator::Up,
            Operator::Up,
            Operator::Right,
            Operator::Up,
            Operator::Left,
            Operator::Left,
        ]
        .into_iter()
        .try_fold(goal.clone(), |state, operator| state.apply(operator))
        .unwrap();
        let config = optimal(HeuristicKind::LinearConflict);
        let expected = a_star_search(&initial, &goal, &config).unwrap().depth();
        let solution = mm_search(&initial, &goal, &config).unwrap();
        assert_eq!(solution.depth(), expected);
    }

    #[test]
    fn test_front_to_front_variants_return_valid_paths() {
        let mut rng = StdRng::seed_from_u64(99);
        let goal = State::goal(3).unwrap();
        for _ in 0..5 {
            let initial = scrambled(3, 24, &mut rng);
            for heuristic in HeuristicKind::ALL {
                let optimal_depth = a_star_search(&initial, &goal, &optimal(heuristic))
                    .unwrap()
                    .depth();
                for variant in [MmVariant::FrontToFront, MmVariant::FrontToFrontEarlyStop] {
                    let config = SearchConfig::new(heuristic).with_mm_variant(variant);
                    let solution = mm_search(&initial, &goal, &config).unwrap();
                    assert!(solution.depth() >= optimal_depth);
                    // The puzzle graph is bipartite.
                    assert_eq!(solution.depth() % 2, optimal_depth % 2);
                    assert_eq!(replay(&initial, &solution.moves()), Some(goal.clone()));
                }
            }
        }
    }

    // MM does not expand fewer nodes than bidirectional A* on every board, so
    // the comparison is only logged. What MM does guarantee is that no node
    // past the midpoint of an optimal path is ever expanded.
    #[test]
    fn test_mm_expansions_stay_within_half_the_optimal_cost() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(7);
        let goal = State::goal(3).unwrap();
        let mut mm_expanded_more = 0;
        let mut runs = 0;

        for _ in 0..20 {
            let initial = scrambled(3, 30, &mut rng);
            for heuristic in HeuristicKind::ALL {
                let config = optimal(heuristic);
                let cost = a_star_search(&initial, &goal, &config).unwrap().depth();
                let mm = mm_search(&initial, &goal, &config).unwrap();
                let bidirectional =
                    bidirectional_a_star_search(&initial, &goal, &config).unwrap();

                assert_eq!(mm.depth(), cost, "{initial}");
                assert_eq!(bidirectional.depth(), cost, "{initial}");
                assert!(
                    2 * mm.stats.max_expanded_g <= cost,
                    "expanded g {} past half of {cost} on\n{initial}",
                    mm.stats.max_expanded_g
                );

                runs += 1;
                if mm.stats.expanded_nodes > bidirectional.stats.expanded_nodes {
                    mm_expanded_more += 1;
                }
            }
        }
        info!("MM expanded more nodes than bidirectional A* in {mm_expanded_more}/{runs} runs");
    }

    #[test]
    fn test_mm_unsolvable_exhausts() {
        let goal = State::goal(2).unwrap();
        let initial = State::new(2, vec![2, 1, 3, 0]).unwrap();
        for variant in [
            MmVariant::Classic,
            MmVariant::FrontToFront,
            MmVariant::FrontToFrontEarlyStop,
        ] {
            let config = SearchConfig::default().with_mm_variant(variant);
            assert!(mm_search(&initial, &goal, &config).is_none());
        }
    }
}
