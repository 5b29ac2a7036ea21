use crate::algebra::{create_edges_from_overlap, update_contain_flags, OverlapComputer};
use crate::edge::{GraphColor, VertexId};
use crate::graph::StringGraph;
use crate::visitor::Visitor;

/// Working error rate remodeling defaults to; committed to the graph in
/// the postvisit step.
pub const DEFAULT_REMODEL_ERROR_RATE: f64 = 0.02;

/// Rebuild each vertex's edge set against the overlap computer: edges
/// with no counterpart in the recomputed irreducible set are dropped,
/// irreducible overlaps with no edge are materialized, and contain
/// flags are refreshed so a containment pass can follow.
pub struct Remodel<'a, C: OverlapComputer + ?Sized> {
    computer: &'a C,
    pub error_rate: f64,
}

impl<'a, C: OverlapComputer + ?Sized> Remodel<'a, C> {
    pub fn new(computer: &'a C) -> Self {
        Remodel {
            computer,
            error_rate: DEFAULT_REMODEL_ERROR_RATE,
        }
    }

    pub fn with_error_rate(computer: &'a C, error_rate: f64) -> Self {
        Remodel {
            computer,
            error_rate,
        }
    }
}

impl<'a, C: OverlapComputer + ?Sized> Visitor for Remodel<'a, C> {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.set_colors(GraphColor::White);
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let mut graph_changed = false;

        let set =
            self.computer
                .irreducible_overlaps(graph, vertex, self.error_rate, graph.min_overlap());
        let mut irreducible = set.irreducible;

        for ix in graph.edges_of(vertex) {
            let desc = graph.edge(ix).desc();
            if irreducible.remove(&desc).is_none() {
                let twin = graph.edge(ix).twin;
                graph.edge_mut(ix).color = GraphColor::Black;
                graph.edge_mut(twin).color = GraphColor::Black;
            }
        }

        for ovr in irreducible.values() {
            create_edges_from_overlap(graph, ovr, false);
            graph_changed = true;
        }

        update_contain_flags(graph, vertex, &set.containments);
        graph_changed
    }

    fn postvisit(&mut self, graph: &mut StringGraph) {
        graph.sweep_edges(GraphColor::Black);
        graph.set_error_rate(self.error_rate);
    }
}

/// Observability-only counterpart of [`Remodel`]: recompute the
/// irreducible set and report the symmetric difference against the
/// current edges. Mutates nothing.
pub struct ValidateStructure<'a, C: OverlapComputer + ?Sized> {
    computer: &'a C,
}

impl<'a, C: OverlapComputer + ?Sized> ValidateStructure<'a, C> {
    pub fn new(computer: &'a C) -> Self {
        ValidateStructure { computer }
    }
}

impl<'a, C: OverlapComputer + ?Sized> Visitor for ValidateStructure<'a, C> {
    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let set = self.computer.irreducible_overlaps(
            graph,
            vertex,
            graph.error_rate(),
            graph.min_overlap(),
        );

        let mut missing = set.irreducible;
        let mut extra = Vec::new();
        for ix in graph.edges_of(vertex) {
            let desc = graph.edge(ix).desc();
            if missing.remove(&desc).is_none() {
                extra.push(graph.edge(ix).overlap.clone());
            }
        }

        if !missing.is_empty() {
            println!("Missing irreducible for {}:", vertex);
            for ovr in missing.values() {
                println!("\t{}", ovr);
            }
        }
        if !extra.is_empty() {
            println!("Extra irreducible for {}:", vertex);
            for ovr in &extra {
                println!("\t{}", ovr);
            }
        }
        false
    }
}
