/*!

Overlap algebra over the graph: inferring the overlap implied by two
overlaps sharing a read, turning overlap records into edge pairs, and
the capability traits for the two external collaborators the
simplification passes lean on (the overlap computer and the error
corrector).

*/

use fnv::FnvHashMap;

use crate::edge::{Edge, EdgeComp, EdgeDesc, EdgeDir, EdgeIx, VertexId};
use crate::graph::StringGraph;
use crate::overlap::{Match, Overlap, SeqCoord};

/// Overlaps keyed by the edge identity they would induce at a vertex.
pub type OverlapMap = FnvHashMap<EdgeDesc, Overlap>;

/// The overlaps reachable from one vertex at a given error rate and
/// minimum overlap length, separated into the irreducible set and the
/// containments.
#[derive(Debug, Default, Clone)]
pub struct VertexOverlapSet {
    pub irreducible: OverlapMap,
    pub containments: OverlapMap,
}

/// External overlap computer. The remodel, validate, and containment
/// passes consume this; the engine never computes fresh alignments
/// itself.
pub trait OverlapComputer {
    /// The irreducible overlaps and containments for `vertex` under the
    /// given parameters.
    fn irreducible_overlaps(
        &self,
        graph: &StringGraph,
        vertex: &VertexId,
        error_rate: f64,
        min_overlap: usize,
    ) -> VertexOverlapSet;

    /// Materialize at `vertex` any edges that become irreducible once the
    /// vertex at the far end of `via` is excised from the graph. `via` is
    /// the half anchored on `vertex` pointing at the doomed vertex.
    fn remodel_for_excision(&self, graph: &mut StringGraph, vertex: &VertexId, via: EdgeIx);
}

/// External read corrector consumed by the error-correction pass.
pub trait ErrorCorrector {
    fn correct_vertex(
        &self,
        graph: &StringGraph,
        vertex: &VertexId,
        k: usize,
        error_rate: f64,
    ) -> Vec<u8>;
}

/// Direction an overlap interval induces on its read's side of an edge:
/// an overlap touching the 3' end extends rightward.
fn coord_dir(c: &SeqCoord) -> EdgeDir {
    if c.is_right_extreme() {
        EdgeDir::Sense
    } else {
        EdgeDir::Antisense
    }
}

fn overlap_comp(ovr: &Overlap) -> EdgeComp {
    if ovr.mat.is_reverse {
        EdgeComp::Reverse
    } else {
        EdgeComp::Same
    }
}

/// Whether the overlaps X~Y and Y~Z share bases of Y, so that an overlap
/// X~Z can be inferred through them.
pub fn has_transitive_overlap(ovr_xy: &Overlap, ovr_yz: &Overlap) -> bool {
    let yx = ovr_xy.mat.swapped();
    Match::intersects(&yx, &ovr_yz.mat)
}

/// The overlap X~Z implied by X~Y and Y~Z, expanded out to the read
/// ends. The caller must have checked `has_transitive_overlap`.
pub fn infer_transitive_overlap(ovr_xy: &Overlap, ovr_yz: &Overlap) -> Overlap {
    let yx = ovr_xy.mat.swapped();
    let mut xz = Match::infer(&yx, &ovr_yz.mat);
    xz.expand();
    Overlap::new(ovr_xy.id[0].clone(), ovr_yz.id[1].clone(), xz)
}

/// The edge identity an overlap would induce at its first read, pointing
/// at `other`.
pub fn overlap_to_edge_desc(other: &VertexId, ovr: &Overlap) -> EdgeDesc {
    EdgeDesc {
        vertex: other.clone(),
        dir: coord_dir(&ovr.mat.coords[0]),
        comp: overlap_comp(ovr),
    }
}

/// Create the twin edge pair for an overlap. A containment overlap flags
/// the contained vertex and sets the graph's containment flag; it only
/// materializes edges when `allow_contained` is set (the identical-read
/// fast path depends on those edges existing).
pub fn create_edges_from_overlap(
    graph: &mut StringGraph,
    ovr: &Overlap,
    allow_contained: bool,
) -> Option<(EdgeIx, EdgeIx)> {
    debug_assert_eq!(graph.vertex(&ovr.id[0]).seq_len(), ovr.mat.coords[0].seq_len);
    debug_assert_eq!(graph.vertex(&ovr.id[1]).seq_len(), ovr.mat.coords[1].seq_len);

    if ovr.is_containment() {
        let idx = ovr.contained_idx();
        graph.set_contained(&ovr.id[idx], true);
        graph.set_containment_flag(true);
        if !allow_contained {
            return None;
        }
    }

    let comp = overlap_comp(ovr);
    let c0 = ovr.mat.coords[0];
    let c1 = ovr.mat.coords[1];
    let e0 = Edge::new(
        ovr.id[0].clone(),
        ovr.id[1].clone(),
        coord_dir(&c0),
        comp,
        ovr.clone(),
        c1.seq_len - c1.len(),
    );
    let e1 = Edge::new(
        ovr.id[1].clone(),
        ovr.id[0].clone(),
        coord_dir(&c1),
        comp,
        ovr.swapped(),
        c0.seq_len - c0.len(),
    );
    Some(graph.create_edge_pair(e0, e1))
}

/// Propagate the contained flags implied by a containment map onto the
/// graph, re-setting the global containment flag when any read is
/// flagged.
pub fn update_contain_flags(graph: &mut StringGraph, vertex: &VertexId, contain_map: &OverlapMap) {
    for ovr in contain_map.values() {
        assert!(ovr.is_containment(), "non-containment overlap in a containment map");
        debug_assert_eq!(&ovr.id[0], vertex);
        let idx = ovr.contained_idx();
        graph.set_contained(&ovr.id[idx], true);
        graph.set_containment_flag(true);
    }
}
