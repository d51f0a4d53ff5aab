use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub depth: usize,
    pub open_nodes: usize,
    pub closed_nodes: usize,
    pub expanded_nodes: usize,
    /// Largest g among expanded nodes, over both directions.
    pub max_expanded_g: usize,
    pub time_us: usize,
}

impl Stats {
    /// Nodes held by the open and closed lists when the search stopped.
    pub fn generated_nodes(&self) -> usize {
        self.open_nodes + self.closed_nodes
    }

    pub(crate) fn record_expansion(&mut self, g: usize) {
        self.expanded_nodes += 1;
        self.max_expanded_g = self.max_expanded_g.max(g);
    }

    pub(crate) fn print(&self) {
        info!(
            "Depth {:?} Time(microseconds) {:?} Nodes generated {:?} ({:?} open/{:?} closed) Expanded {:?}",
            self.depth,
            self.time_us,
            self.generated_nodes(),
            self.open_nodes,
            self.closed_nodes,
            self.expanded_nodes
        );
    }
}
