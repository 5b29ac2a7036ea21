/*!

The traversal harness. A pass over the graph is a [`Visitor`]: a bit of
state with a `previsit`/`visit`/`postvisit` contract, driven over every
vertex by [`visit_graph`].

Vertices must never be added or removed inside `visit`; removal is
deferred by coloring and swept from `postvisit`. Edge mutation is
allowed only where a pass's own contract says so.

*/

use crate::edge::VertexId;
use crate::graph::StringGraph;

/// One simplification or reporting pass.
pub trait Visitor {
    fn previsit(&mut self, _graph: &mut StringGraph) {}

    /// Process one vertex; the return value reports whether the graph
    /// changed on account of it.
    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool;

    fn postvisit(&mut self, _graph: &mut StringGraph) {}
}

/// Run one full pass: `previsit`, then `visit` for every vertex in the
/// graph's stable iteration order, then `postvisit`. Returns whether any
/// vertex reported a change.
pub fn visit_graph<V: Visitor + ?Sized>(graph: &mut StringGraph, visitor: &mut V) -> bool {
    visitor.previsit(graph);
    let order = graph.vertex_ids();
    let mut changed = false;
    for id in &order {
        changed |= visitor.visit(graph, id);
    }
    visitor.postvisit(graph);
    changed
}

/// Rerun a pass until it reports no change. Returns the number of rounds
/// that changed the graph.
pub fn visit_until_stable<V: Visitor + ?Sized>(graph: &mut StringGraph, visitor: &mut V) -> usize {
    let mut rounds = 0;
    while visit_graph(graph, visitor) {
        rounds += 1;
    }
    rounds
}
