use log::{debug, info};

use crate::algebra::OverlapComputer;
use crate::edge::{GraphColor, VertexId};
use crate::graph::StringGraph;
use crate::visitor::{visit_graph, Visitor};

/// Fast-path containment removal for exactly identical reads.
///
/// A contained vertex whose sequence is byte-identical to a neighbor it
/// is contained in (same length, same strand) can be dropped without
/// touching the rest of the graph; no irreducible edge needs to move.
#[derive(Debug, Default)]
pub struct IdenticalRemove {
    pub count: usize,
}

impl IdenticalRemove {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for IdenticalRemove {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.set_colors(GraphColor::White);
        self.count = 0;
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        if !graph.vertex(vertex).contained {
            return false;
        }

        for ix in graph.edges_of(vertex) {
            let other = graph.edge(ix).end.clone();
            if graph.vertex(vertex).seq_len() != graph.vertex(&other).seq_len() {
                continue;
            }
            {
                let ovr = &graph.edge(ix).overlap;
                if !ovr.is_containment() || ovr.contained_idx() != 0 {
                    continue;
                }
            }
            if graph.vertex(vertex).seq == graph.vertex(&other).seq {
                graph.vertex_mut(vertex).color = GraphColor::Black;
                self.count += 1;
                break;
            }
        }
        false
    }

    fn postvisit(&mut self, graph: &mut StringGraph) {
        graph.sweep_vertices(GraphColor::Black);
    }
}

/// General containment removal.
///
/// On a transitively reduced graph, excising a contained vertex can
/// orphan paths that ran through it, so each neighbor is remodeled first
/// (in ascending edge length order; remodeling out of order can create
/// spurious transitive edges). On a complete overlap graph every
/// irreducible edge still exists elsewhere, so the edges are simply
/// dropped.
///
/// The previsit clears the graph's containment flag; remodeling may
/// re-set it, in which case the pass must be rerun. [`remove_contained`]
/// drives that loop.
pub struct ContainRemove<'a, C: OverlapComputer + ?Sized> {
    computer: &'a C,
}

impl<'a, C: OverlapComputer + ?Sized> ContainRemove<'a, C> {
    pub fn new(computer: &'a C) -> Self {
        ContainRemove { computer }
    }
}

impl<'a, C: OverlapComputer + ?Sized> Visitor for ContainRemove<'a, C> {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.set_colors(GraphColor::White);
        graph.set_containment_flag(false);
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        if !graph.vertex(vertex).contained {
            return false;
        }

        if !graph.has_transitive() && !graph.is_exact_mode() {
            let mut neighbor_edges = graph.edges_of(vertex);
            neighbor_edges.sort_by_key(|&ix| graph.edge(ix).seq_len);
            for &ix in &neighbor_edges {
                let neighbor = graph.edge(ix).end.clone();
                let via = graph.edge(ix).twin;
                self.computer.remodel_for_excision(graph, &neighbor, via);
            }
        }

        graph.delete_vertex_edges(vertex);
        graph.vertex_mut(vertex).color = GraphColor::Black;
        false
    }

    fn postvisit(&mut self, graph: &mut StringGraph) {
        graph.sweep_vertices(GraphColor::Black);
    }
}

/// Run containment removal to a fixed point: remodeling can introduce
/// fresh containments, which re-set the graph flag and demand another
/// round. Returns the number of rounds run.
pub fn remove_contained<C: OverlapComputer + ?Sized>(
    graph: &mut StringGraph,
    computer: &C,
) -> usize {
    let mut rounds = 0;
    while graph.has_containment() {
        let mut pass = ContainRemove::new(computer);
        visit_graph(graph, &mut pass);
        rounds += 1;
        debug!("containment removal round {} complete", rounds);
    }
    info!("containment removal reached a fixed point after {} rounds", rounds);
    rounds
}
