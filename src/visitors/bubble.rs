use log::info;

use crate::edge::{GraphColor, VertexId, DIRECTIONS};
use crate::graph::StringGraph;
use crate::visitor::Visitor;

/// Collapse one-step-out-and-in variant bubbles anchored at a vertex.
///
/// For a vertex with a fan-out, each branch vertex with a single onward
/// edge nominates its endpoint; a branch whose endpoint was already
/// nominated duplicates an earlier branch and is colored red for the
/// sweep. Black claims an endpoint, blue claims a branch; both are
/// restored to white before the vertex is left. Seeing red anywhere in
/// the candidate set means a bubble marked earlier in this pass touches
/// these vertices, and the whole vertex is conservatively skipped.
#[derive(Debug, Default)]
pub struct BubbleCollapse {
    pub num_bubbles: usize,
}

impl BubbleCollapse {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for BubbleCollapse {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.set_colors(GraphColor::White);
        self.num_bubbles = 0;
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let mut bubble_found = false;

        for &dir in &DIRECTIONS {
            let edges = graph.edges_dir(vertex, dir);
            if edges.len() <= 1 {
                continue;
            }

            // interference check before touching any color
            for &vw in &edges {
                let w = graph.edge(vw).end.clone();
                if graph.vertex(&w).color == GraphColor::Red {
                    return false;
                }
                let trans_dir = !graph.edge(vw).twin_dir();
                let w_out = graph.edges_dir(&w, trans_dir);
                if w_out.len() == 1 {
                    let u = graph.edge(w_out[0]).end.clone();
                    if graph.vertex(&u).color == GraphColor::Red {
                        return false;
                    }
                }
            }

            // nominate endpoints; a re-nominated endpoint exposes a bubble
            for &vw in &edges {
                let w = graph.edge(vw).end.clone();
                let trans_dir = !graph.edge(vw).twin_dir();
                let w_out = graph.edges_dir(&w, trans_dir);
                if w_out.len() == 1 {
                    let u = graph.edge(w_out[0]).end.clone();
                    if graph.vertex(&u).color == GraphColor::Black {
                        graph.vertex_mut(&w).color = GraphColor::Red;
                        bubble_found = true;
                    } else {
                        graph.vertex_mut(&u).color = GraphColor::Black;
                        graph.vertex_mut(&w).color = GraphColor::Blue;
                    }
                }
            }

            // restore claims, keeping the red branches for the sweep
            for &vw in &edges {
                let w = graph.edge(vw).end.clone();
                let trans_dir = !graph.edge(vw).twin_dir();
                let w_out = graph.edges_dir(&w, trans_dir);
                if w_out.len() == 1 {
                    let u = graph.edge(w_out[0]).end.clone();
                    graph.vertex_mut(&u).color = GraphColor::White;
                }
                if graph.vertex(&w).color == GraphColor::Blue {
                    graph.vertex_mut(&w).color = GraphColor::White;
                }
            }

            if bubble_found {
                self.num_bubbles += 1;
            }
        }
        bubble_found
    }

    fn postvisit(&mut self, graph: &mut StringGraph) {
        graph.sweep_vertices(GraphColor::Red);
        info!("bubbles: {}", self.num_bubbles);
        assert!(graph.check_colors(GraphColor::White));
    }
}
