use log::info;

use crate::edge::{GraphColor, VertexId, DIRECTIONS};
use crate::graph::StringGraph;
use crate::visitor::Visitor;

/// Dead-end removal: a vertex with no extension in at least one
/// direction is a tip (or an island, when both sides are empty) and is
/// swept. Rerun the pass to a fixed point to eat back chains of tips.
#[derive(Debug, Default)]
pub struct Trim {
    pub num_island: usize,
    pub num_terminal: usize,
    pub num_contig: usize,
}

impl Trim {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for Trim {
    fn previsit(&mut self, graph: &mut StringGraph) {
        self.num_island = 0;
        self.num_terminal = 0;
        self.num_contig = 0;
        graph.set_colors(GraphColor::White);
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let mut noext = [false; 2];

        for (i, &dir) in DIRECTIONS.iter().enumerate() {
            if graph.count_edges_dir(vertex, dir) == 0 {
                graph.vertex_mut(vertex).color = GraphColor::Black;
                noext[i] = true;
            }
        }

        if noext[0] && noext[1] {
            self.num_island += 1;
        } else if noext[0] || noext[1] {
            self.num_terminal += 1;
        } else {
            self.num_contig += 1;
        }
        noext[0] || noext[1]
    }

    fn postvisit(&mut self, graph: &mut StringGraph) {
        graph.sweep_vertices(GraphColor::Black);
        info!(
            "island: {} terminal: {} contig: {}",
            self.num_island, self.num_terminal, self.num_contig
        );
    }
}

/// Remove vertices with no edges at all.
#[derive(Debug, Default)]
pub struct IslandRemove {
    pub removed: usize,
}

impl IslandRemove {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for IslandRemove {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.set_colors(GraphColor::White);
        self.removed = 0;
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        if graph.count_edges(vertex) == 0 {
            graph.vertex_mut(vertex).color = GraphColor::Black;
            return true;
        }
        false
    }

    fn postvisit(&mut self, graph: &mut StringGraph) {
        self.removed = graph.sweep_vertices(GraphColor::Black);
    }
}
