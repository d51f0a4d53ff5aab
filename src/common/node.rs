use super::state::{Operator, State};

use std::ops::Index;
use std::rc::Rc;

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: Rc<State>,
    pub parent: Option<NodeId>,
    // Forward move leading from `parent` to `state`. Backward-search nodes
    // store the move that leads from `state` to `parent` instead.
    pub operator: Option<Operator>,
    pub g: usize,
    pub h: usize,
}

impl SearchNode {
    pub fn f(&self) -> usize {
        self.g + self.h
    }

    pub fn depth(&self) -> usize {
        self.g
    }
}

/// Owns every node generated by one search. Parents are indices into it.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&mut self, state: Rc<State>, h: usize) -> NodeId {
        self.push(SearchNode {
            state,
            parent: None,
            operator: None,
            g: 0,
            h,
        })
    }

    pub fn child(
        &mut self,
        parent: NodeId,
        state: Rc<State>,
        operator: Operator,
        h: usize,
    ) -> NodeId {
        let g = self.nodes[parent].g + 1;
        self.push(SearchNode {
            state,
            parent: Some(parent),
            operator: Some(operator),
            g,
            h,
        })
    }

    fn push(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Node ids from the root down to `id`.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Extend the forward chain ending at `forward` with the backward chain
    /// starting at `backward` (both hold the same state). Returns the new
    /// terminal node, which holds the backward root's state.
    pub fn splice(&mut self, forward: NodeId, backward: NodeId) -> NodeId {
        let mut current = forward;
        let mut cursor = backward;
        while let (Some(next), Some(operator)) =
            (self.nodes[cursor].parent, self.nodes[cursor].operator)
        {
            let state = Rc::clone(&self.nodes[next].state);
            // Remaining distance along the backward chain is exact.
            let h = self.nodes[next].g;
            current = self.child(current, state, operator, h);
            cursor = next;
        }
        current
    }
}

impl Index<NodeId> for NodeArena {
    type Output = SearchNode;

    fn index(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_root() {
        let goal = Rc::new(State::goal(3).unwrap());
        let mut arena = NodeArena::new();
        let root = arena.root(Rc::clone(&goal), 0);

        let first = Rc::new(goal.apply(Operator::Up).unwrap());
        let a = arena.child(root, Rc::clone(&first), Operator::Up, 1);
        let second = Rc::new(first.apply(Operator::Left).unwrap());
        let b = arena.child(a, second, Operator::Left, 2);

        assert_eq!(arena[b].g, 2);
        assert_eq!(arena[b].f(), 4);
        assert_eq!(arena.path_to(b), vec![root, a, b]);
        assert_eq!(arena[b].operator, Some(Operator::Left));
    }

    #[test]
    fn test_splice_backward_chain() {
        // initial -Up-> middle -Left-> goal, with the meeting at `middle`.
        let initial = Rc::new(State::goal(3).unwrap());
        let middle = Rc::new(initial.apply(Operator::Up).unwrap());
        let goal = Rc::new(middle.apply(Operator::Left).unwrap());

        let mut arena = NodeArena::new();
        let forward_root = arena.root(Rc::clone(&initial), 0);
        let forward = arena.child(forward_root, Rc::clone(&middle), Operator::Up, 0);

        let backward_root = arena.root(Rc::clone(&goal), 0);
        // Backward nodes keep the forward move towards their parent.
        let backward = arena.child(backward_root, Rc::clone(&middle), Operator::Left, 0);

        let terminal = arena.splice(forward, backward);
        assert_eq!(*arena[terminal].state, *goal);
        assert_eq!(arena[terminal].g, 2);
        assert_eq!(arena[terminal].operator, Some(Operator::Left));
        assert_eq!(arena[terminal].parent, Some(forward));
    }
}
