use std::collections::VecDeque;

use log::{info, warn};

use crate::algebra::{has_transitive_overlap, infer_transitive_overlap, overlap_to_edge_desc};
use crate::edge::{EdgeDesc, GraphColor, VertexId, DIRECTIONS};
use crate::graph::StringGraph;
use crate::overlap::Overlap;
use crate::visitor::Visitor;

/// Upper bound on queue pops in one bubble walk. This bounds work per
/// candidate bubble, not path length; a walk that runs out of budget
/// simply leaves the bubble in place.
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Collapse two-edge bubbles by walking inferred overlaps.
///
/// At a vertex with exactly two edges on one side, the shorter-overlap
/// branch is the suspect. Its downstream neighbors become the target
/// set; a breadth-first walk from the longer branch over inferred
/// transitive overlaps tries to reach them all. If it does, the suspect
/// branch is redundant: its endpoint loses all edges and is swept.
///
/// Equal overlap lengths abort the vertex: two equal-length overlaps on
/// one side would make one endpoint contain the other.
pub struct EdgeBubbleCollapse {
    pub max_steps: usize,
    pub num_bubbles: usize,
    budget_warned: bool,
}

impl EdgeBubbleCollapse {
    pub fn new(max_steps: usize) -> Self {
        EdgeBubbleCollapse {
            max_steps,
            num_bubbles: 0,
            budget_warned: false,
        }
    }
}

impl Default for EdgeBubbleCollapse {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS)
    }
}

impl Visitor for EdgeBubbleCollapse {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.set_colors(GraphColor::White);
        self.num_bubbles = 0;
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let mut bubble_found = false;

        'dirs: for &dir in &DIRECTIONS {
            let edges = graph.edges_dir(vertex, dir);
            if edges.len() != 2 {
                continue;
            }

            // the longer overlap is the trusted branch
            let len0 = graph.edge(edges[0]).overlap_length(0);
            let len1 = graph.edge(edges[1]).overlap_length(0);
            let (xy, xz) = if len0 > len1 {
                (edges[0], edges[1])
            } else if len1 > len0 {
                (edges[1], edges[0])
            } else {
                break 'dirs;
            };

            let z = graph.edge(xz).end.clone();
            let target_dir = graph.edge(xz).transitive_dir();
            let mut targets: Vec<VertexId> = graph
                .edges_dir(&z, target_dir)
                .into_iter()
                .map(|ix| graph.edge(ix).end.clone())
                .collect();

            let mut queue: VecDeque<(EdgeDesc, Overlap)> = VecDeque::new();
            queue.push_back((graph.edge(xy).desc(), graph.edge(xy).overlap.clone()));

            let mut steps = self.max_steps;
            while let Some((ed_xy, ovr_xy)) = queue.pop_front() {
                if steps == 0 {
                    if !self.budget_warned {
                        warn!(
                            "bubble walk stopped at the {}-step budget; bubble left in place",
                            self.max_steps
                        );
                        self.budget_warned = true;
                    }
                    break;
                }
                steps -= 1;

                targets.retain(|t| *t != ed_xy.vertex);
                if targets.is_empty() {
                    break;
                }

                let dir_y = ed_xy.transitive_dir();
                for ix in graph.edges_dir(&ed_xy.vertex, dir_y) {
                    let next = graph.edge(ix).end.clone();
                    let ovr_yz = graph.edge(ix).overlap.clone();
                    if has_transitive_overlap(&ovr_xy, &ovr_yz) {
                        let ovr_xz = infer_transitive_overlap(&ovr_xy, &ovr_yz);
                        let ed_xz = overlap_to_edge_desc(&next, &ovr_xz);
                        queue.push_back((ed_xz, ovr_xz));
                    }
                }
            }

            if targets.is_empty() {
                graph.delete_vertex_edges(&z);
                graph.vertex_mut(&z).color = GraphColor::Red;
                bubble_found = true;
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
