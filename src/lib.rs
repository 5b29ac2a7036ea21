/*!
A string-graph simplification engine for overlap-based de novo sequence
assembly.

# Overview

Every vertex of a string graph holds a read; every edge records an
approximate suffix-prefix overlap between two reads, as a pair of twin
halves (one per endpoint) so that each side carries its own direction.
The raw graph built from all pairwise overlaps is dense and redundant;
this crate reduces it to an irreducible skeleton that contigs can be
walked from.

The reductions are expressed as *passes* over the vertex set, driven by
the harness in [`visitor`]:

* [`visitors::TransitiveReduction`] removes edges spanned by two-hop
  paths (Myers' algorithm).
* [`visitors::IdenticalRemove`] and [`visitors::ContainRemove`]
  eliminate reads contained in other reads.
* [`visitors::Trim`] and [`visitors::IslandRemove`] drop dead ends and
  unconnected reads.
* [`visitors::BubbleCollapse`] and [`visitors::EdgeBubbleCollapse`]
  collapse short variant bubbles.
* [`visitors::DuplicateRemove`] and [`visitors::SmallRepeatResolve`]
  clean up duplicated edges and edges induced by sub-read-length
  repeats.
* [`visitors::Remodel`] and [`visitors::ValidateStructure`] rebuild or
  audit the edge set against an external overlap computer.
* Reporting passes ([`visitors::GraphStats`], [`visitors::EdgeStats`],
  and the writers) observe the graph without reshaping it.

Passes coordinate exclusively through the color field carried by every
vertex and edge: a pass owns all colors while it runs and must restore
the all-white precondition before returning, except for elements it has
flagged for a sweep in its postvisit step.

# Core types

* [`graph::StringGraph`] owns the vertices and the arena of edge
  halves; twin pointers are arena indices.
* [`edge::Edge`], [`edge::EdgeDesc`], [`edge::EdgeDir`], and
  [`edge::EdgeComp`] describe the bidirected edge model.
* [`overlap::Overlap`] and [`overlap::Match`] carry the interval
  algebra the passes reason with.
* [`algebra`] holds the overlap composition rules and the capability
  traits for the external overlap computer and error corrector.
*/

pub mod algebra;
pub mod edge;
pub mod graph;
pub mod overlap;
pub mod visitor;
pub mod visitors;

pub use crate::edge::{Edge, EdgeComp, EdgeDesc, EdgeDir, EdgeIx, GraphColor, VertexId, DIRECTIONS};
pub use crate::graph::{StringGraph, Vertex};
pub use crate::overlap::{Match, Overlap, SeqCoord};
pub use crate::visitor::{visit_graph, visit_until_stable, Visitor};
