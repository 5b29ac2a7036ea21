use log::warn;

use crate::edge::{GraphColor, VertexId};
use crate::graph::StringGraph;
use crate::visitor::Visitor;

/// Detect and remove edges that duplicate another edge's identity at the
/// same vertex. Duplicates are a loader anomaly, so finding any is
/// reported as a warning rather than an error.
#[derive(Debug, Default)]
pub struct DuplicateRemove {
    has_duplicate: bool,
}

impl DuplicateRemove {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for DuplicateRemove {
    fn previsit(&mut self, graph: &mut StringGraph) {
        assert!(graph.check_colors(GraphColor::White));
        self.has_duplicate = false;
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        self.has_duplicate = graph.mark_duplicate_edges(vertex, GraphColor::Red) || self.has_duplicate;
        false
    }

    fn postvisit(&mut self, graph: &mut StringGraph) {
        if self.has_duplicate {
            let num_removed = graph.sweep_edges(GraphColor::Red);
            warn!("removed {} duplicate edges", num_removed);
        }
        assert!(graph.check_colors(GraphColor::White));
    }
}
