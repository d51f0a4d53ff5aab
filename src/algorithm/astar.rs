use crate::common::{ClosedList, NodeArena, OpenEntry, OpenList, Operator, State};
use crate::config::{DuplicatePolicy, SearchConfig};
use crate::solver::Solution;
use crate::stat::Stats;

use std::rc::Rc;
use tracing::{debug, instrument, trace};

#[instrument(skip_all, name = "a_star", fields(size = initial.size(), heuristic = ?config.heuristic), level = "debug")]
pub(crate) fn a_star_search(
    initial: &State,
    goal: &State,
    config: &SearchConfig,
) -> Option<Solution> {
    let goal = Rc::new(goal.clone());
    let initial = Rc::new(initial.clone());

    let mut arena = NodeArena::new();
    let mut stats = Stats::default();
    let mut open_list = OpenList::new();
    let mut closed_list = ClosedList::new();

    let start_h = initial.h(&goal, config.heuristic);
    let root = arena.root(Rc::clone(&initial), start_h);
    if initial == goal {
        stats.open_nodes = 1;
        return Some(Solution::new(arena, root, stats));
    }
    open_list.insert(OpenEntry {
        priority: start_h,
        f: start_h,
        g: 0,
        id: root,
        state: initial,
    });

    while let Some(current) = open_list.pop_first() {
        trace!("expand node: {:?} f {:?}", current.id, current.f);

        // Update stats.
        stats.record_expansion(current.g);

        closed_list.insert(Rc::clone(&current.state), current.id);

        // Assuming uniform cost.
        let tentative_g_cost = current.g + 1;

        for operator in Operator::ALL {
            // Inapplicable at the board edge, or already expanded.
            let Some(next) = current.state.apply(operator) else {
                continue;
            };
            if closed_list.contains(&next) {
                continue;
            }

            if next == *goal {
                let id = arena.child(current.id, Rc::clone(&goal), operator, 0);
                stats.open_nodes = open_list.len() + 1;
                stats.closed_nodes = closed_list.len();
                debug!("found goal at depth {:?}", tentative_g_cost);
                return Some(Solution::new(arena, id, stats));
            }

            let h = match open_list.get(&next) {
                None => next.h(&goal, config.heuristic),
                // A cheaper path to an open state re-parents it.
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
            open_list.insert(OpenEntry {
                priority: tentative_g_cost + h,
                f: tentative_g_cost + h,
                g: tentative_g_cost,
                id,
                state: next,
            });
        }
    }

    debug!("cannot find solution");
    None
}
