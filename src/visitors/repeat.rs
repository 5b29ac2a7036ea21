use log::info;

use crate::edge::{VertexId, DIRECTIONS};
use crate::graph::StringGraph;
use crate::visitor::Visitor;

/// Remove edges induced by repeats shorter than a read.
///
/// A repeat shorter than the read length shows up as a short overlap
/// X~Y flanked by strictly longer overlaps on both vertices: X has a
/// longer edge elsewhere, and Y has a longer edge than Y~X on the same
/// side. When both margins exceed `min_diff` the short edge is almost
/// certainly repeat-induced and is deleted.
pub struct SmallRepeatResolve {
    pub min_diff: isize,
    pub resolved: usize,
}

impl SmallRepeatResolve {
    pub fn new(min_diff: isize) -> Self {
        SmallRepeatResolve {
            min_diff,
            resolved: 0,
        }
    }
}

impl Visitor for SmallRepeatResolve {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.sort_adj_by_len();
        self.resolved = 0;
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let mut changed = false;

        for &dir in &DIRECTIONS {
            let x_edges = graph.edges_dir(vertex, dir);
            if x_edges.len() < 2 {
                continue;
            }

            // ascending seq_len puts the shortest overlap last
            let xy = x_edges[x_edges.len() - 1];
            let xy_len = graph.edge(xy).overlap_length(0) as isize;
            let x_longest_len = graph.edge(x_edges[0]).overlap_length(0) as isize;
            if xy_len == x_longest_len {
                continue;
            }

            let yx = graph.edge(xy).twin;
            let y = graph.edge(xy).end.clone();
            let y_dir = graph.edge(yx).dir;
            let yx_len = graph.edge(yx).overlap_length(0) as isize;

            let mut y_longest_len = 0isize;
            for ix in graph.edges_dir(&y, y_dir) {
                if ix == yx {
                    continue;
                }
                y_longest_len = y_longest_len.max(graph.edge(ix).overlap_length(0) as isize);
            }

            if y_longest_len > yx_len {
                let x_diff = x_longest_len - xy_len;
                let y_diff = y_longest_len - yx_len;

                if x_diff > self.min_diff && y_diff > self.min_diff {
                    info!(
                        "edge {} -> {} is likely repeat-induced: overlaps {} and {} spanned by {} and {}",
                        vertex, y, xy_len, yx_len, x_longest_len, y_longest_len
                    );
                    graph.delete_edge_pair(xy);
                    self.resolved += 1;
                    changed = true;
                }
            }
        }
        changed
    }
}
