use log::info;

use crate::edge::{GraphColor, VertexId, DIRECTIONS};
use crate::graph::StringGraph;
use crate::visitor::Visitor;

/// Tolerance on the two-hop length bound (Myers 2005); a spanning path
/// may exceed the longest direct edge by this many bases and still mark
/// the direct edge transitive.
pub const DEFAULT_FUZZ: usize = 10;

/// Transitive reduction of the edge set.
///
/// An edge v->x is transitive if some two-hop path v->w->x covers nearly
/// the same sequence. Stage 1 marks endpoints reachable within the
/// length bound; stage 2 additionally marks each neighbor's shortest
/// outgoing edge (and any sub-fuzz edge) at the near end.
///
/// Preconditions: no containments in the graph, all colors white (set in
/// `previsit`). Adjacency lists are sorted here; both stages rely on the
/// ascending order to cut their scans short.
pub struct TransitiveReduction {
    pub fuzz: usize,
    marked_verts: usize,
    marked_edges: usize,
}

impl TransitiveReduction {
    pub fn new(fuzz: usize) -> Self {
        TransitiveReduction {
            fuzz,
            marked_verts: 0,
            marked_edges: 0,
        }
    }

    pub fn marked_edges(&self) -> usize {
        self.marked_edges
    }
}

impl Default for TransitiveReduction {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZ)
    }
}

impl Visitor for TransitiveReduction {
    fn previsit(&mut self, graph: &mut StringGraph) {
        assert!(
            !graph.has_containment(),
            "transitive reduction requires a containment-free graph"
        );
        graph.set_colors(GraphColor::White);
        graph.sort_adj_by_len();
        self.marked_verts = 0;
        self.marked_edges = 0;
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let mut trans_count = 0;

        for &dir in &DIRECTIONS {
            let edges = graph.edges_dir(vertex, dir);
            if edges.is_empty() {
                continue;
            }

            for &ix in &edges {
                let end = graph.edge(ix).end.clone();
                graph.vertex_mut(&end).color = GraphColor::Gray;
            }

            let longest_len = graph.edge(edges[edges.len() - 1]).seq_len + self.fuzz;

            // Stage 1: walk two-hop paths while they fit the length bound
            for &vw in &edges {
                let w = graph.edge(vw).end.clone();
                if graph.vertex(&w).color != GraphColor::Gray {
                    continue;
                }
                let vw_len = graph.edge(vw).seq_len;
                let trans_dir = !graph.edge(vw).twin_dir();
                for wx in graph.edges_dir(&w, trans_dir) {
                    if vw_len + graph.edge(wx).seq_len > longest_len {
                        break;
                    }
                    let x = graph.edge(wx).end.clone();
                    if graph.vertex(&x).color == GraphColor::Gray {
                        graph.vertex_mut(&x).color = GraphColor::Black;
                    }
                }
            }

            // Stage 2: each neighbor's shortest edge, plus sub-fuzz edges,
            // spans its endpoint regardless of the bound
            for &vw in &edges {
                let w = graph.edge(vw).end.clone();
                let trans_dir = !graph.edge(vw).twin_dir();
                for (j, wx) in graph.edges_dir(&w, trans_dir).into_iter().enumerate() {
                    if graph.edge(wx).seq_len >= self.fuzz && j != 0 {
                        break;
                    }
                    let x = graph.edge(wx).end.clone();
                    if graph.vertex(&x).color == GraphColor::Gray {
                        graph.vertex_mut(&x).color = GraphColor::Black;
                    }
                }
            }

            for &ix in &edges {
                let end = graph.edge(ix).end.clone();
                if graph.vertex(&end).color == GraphColor::Black {
                    let twin = graph.edge(ix).twin;
                    if graph.edge(ix).color != GraphColor::Black
                        || graph.edge(twin).color != GraphColor::Black
                    {
                        graph.edge_mut(ix).color = GraphColor::Black;
                        graph.edge_mut(twin).color = GraphColor::Black;
                        self.marked_edges += 2;
                        trans_count += 1;
                    }
                }
                graph.vertex_mut(&end).color = GraphColor::White;
            }
        }

        if trans_count > 0 {
            self.marked_verts += 1;
        }
        false
    }

    fn postvisit(&mut self, graph: &mut StringGraph) {
        info!(
            "transitive reduction marked {} vertices and {} edges",
            self.marked_verts, self.marked_edges
        );
        graph.sweep_edges(GraphColor::Black);
        graph.set_transitive_flag(false);
        assert!(graph.check_colors(GraphColor::White));
    }
}
