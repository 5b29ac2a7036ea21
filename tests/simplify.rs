use std::collections::HashMap;

use stringgraph::algebra::{
    create_edges_from_overlap, overlap_to_edge_desc, ErrorCorrector, OverlapComputer,
    VertexOverlapSet,
};
use stringgraph::visitors::{
    remove_contained, BreakWriter, BubbleCollapse, DuplicateRemove, EdgeBubbleCollapse, EdgeStats,
    ErrorCorrect, FastaWriter, GraphStats, IdenticalRemove, IslandRemove, OverlapWriter, Remodel,
    SmallRepeatResolve, TransitiveReduction, Trim,
};
use stringgraph::{
    visit_graph, EdgeIx, GraphColor, Match, Overlap, SeqCoord, StringGraph, VertexId,
};

/// Deterministic pseudo-random DNA.
fn genome(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            b"ACGT"[(state >> 5) as usize % 4]
        })
        .collect()
}

fn add_read(g: &mut StringGraph, genome: &[u8], id: &str, off: usize, len: usize) {
    g.add_vertex(id.into(), genome[off..off + len].to_vec());
}

/// Same-strand overlap between two reads tiled over one region.
fn tiled_overlap(a: (&str, usize, usize), b: (&str, usize, usize)) -> Overlap {
    let (id_a, off_a, len_a) = a;
    let (id_b, off_b, len_b) = b;
    let s = off_a.max(off_b);
    let e = (off_a + len_a).min(off_b + len_b);
    assert!(s < e, "reads {} and {} do not overlap", id_a, id_b);
    Overlap::new(
        id_a.into(),
        id_b.into(),
        Match::new(
            SeqCoord::new(s - off_a, e - 1 - off_a, len_a),
            SeqCoord::new(s - off_b, e - 1 - off_b, len_b),
            false,
            0,
        ),
    )
}

fn link(g: &mut StringGraph, a: (&str, usize, usize), b: (&str, usize, usize)) {
    create_edges_from_overlap(g, &tiled_overlap(a, b), false)
        .expect("fixture overlap should not be a containment");
}

fn assert_twin_consistent(g: &StringGraph) {
    for ix in g.edge_indices() {
        let e = g.edge(ix);
        let t = g.edge(e.twin);
        assert_eq!(t.twin, ix);
        assert_eq!(t.start, e.end);
        assert_eq!(t.end, e.start);
        assert!(g.edges_of(&e.start).contains(&ix));
        assert!(g.edges_of(&t.start).contains(&e.twin));
    }
}

fn vid(s: &str) -> VertexId {
    s.into()
}

// ---- transitive reduction ----

/// A, B, C tiled left to right; the direct A~C overlap is spanned by
/// A~B plus B~C and must go.
fn transitive_chain() -> StringGraph {
    let region = genome(200, 7);
    let mut g = StringGraph::new(15, 0.0);
    let (a, b, c) = (("a", 0, 100), ("b", 40, 100), ("c", 80, 100));
    add_read(&mut g, &region, "a", 0, 100);
    add_read(&mut g, &region, "b", 40, 100);
    add_read(&mut g, &region, "c", 80, 100);
    link(&mut g, a, b);
    link(&mut g, b, c);
    link(&mut g, a, c);
    g
}

#[test]
fn transitive_chain_loses_the_spanned_edge() {
    let mut g = transitive_chain();
    assert_eq!(g.edge_count(), 6);

    visit_graph(&mut g, &mut TransitiveReduction::default());

    assert_eq!(g.edge_count(), 4);
    assert_eq!(g.count_edges(&vid("a")), 1);
    assert_eq!(g.count_edges(&vid("b")), 2);
    assert_eq!(g.count_edges(&vid("c")), 1);
    // a's surviving neighbor is b, not c
    let a_edges = g.edges_of(&vid("a"));
    assert_eq!(g.edge(a_edges[0]).end, vid("b"));
    assert!(!g.has_transitive());
    assert!(g.check_colors(GraphColor::White));
    assert_twin_consistent(&g);
}

#[test]
fn transitive_reduction_is_idempotent_on_the_chain() {
    let mut g = transitive_chain();
    visit_graph(&mut g, &mut TransitiveReduction::default());
    let after_first = g.edge_count();

    let mut second = TransitiveReduction::default();
    visit_graph(&mut g, &mut second);
    assert_eq!(second.marked_edges(), 0);
    assert_eq!(g.edge_count(), after_first);
}

// ---- containment ----

#[test]
fn identical_reads_collapse_to_one_survivor() {
    let region = genome(200, 11);
    let mut g = StringGraph::new(15, 0.0);
    add_read(&mut g, &region, "s", 0, 100);
    add_read(&mut g, &region, "r1", 30, 100);
    add_read(&mut g, &region, "r2", 30, 100);
    link(&mut g, ("s", 0, 100), ("r1", 30, 100));
    link(&mut g, ("s", 0, 100), ("r2", 30, 100));
    create_edges_from_overlap(&mut g, &tiled_overlap(("r1", 30, 100), ("r2", 30, 100)), true)
        .expect("identical pair should still create its containment edges");

    assert!(g.has_containment());
    assert!(g.vertex(&vid("r1")).contained);
    assert!(!g.vertex(&vid("r2")).contained);

    let mut pass = IdenticalRemove::new();
    visit_graph(&mut g, &mut pass);

    assert_eq!(pass.count, 1);
    assert!(!g.has_vertex(&vid("r1")));
    assert!(g.has_vertex(&vid("r2")));
    // the survivor keeps its own edges
    assert_eq!(g.count_edges(&vid("r2")), 1);
    assert_eq!(g.count_edges(&vid("s")), 1);
    assert_twin_consistent(&g);
}

struct UnusedComputer;

impl OverlapComputer for UnusedComputer {
    fn irreducible_overlaps(
        &self,
        _graph: &StringGraph,
        _vertex: &VertexId,
        _error_rate: f64,
        _min_overlap: usize,
    ) -> VertexOverlapSet {
        unreachable!("a complete overlap graph never recomputes overlap sets")
    }

    fn remodel_for_excision(&self, _graph: &mut StringGraph, _vertex: &VertexId, _via: EdgeIx) {
        unreachable!("a complete overlap graph needs no remodeling")
    }
}

#[test]
fn contained_read_is_excised_to_a_fixed_point() {
    let region = genome(250, 13);
    let mut g = StringGraph::new(15, 0.0);
    add_read(&mut g, &region, "s", 0, 140);
    add_read(&mut g, &region, "r", 20, 100);
    add_read(&mut g, &region, "q", 60, 100);
    create_edges_from_overlap(&mut g, &tiled_overlap(("s", 0, 140), ("r", 20, 100)), true)
        .expect("containment edges requested");
    link(&mut g, ("r", 20, 100), ("q", 60, 100));
    link(&mut g, ("s", 0, 140), ("q", 60, 100));

    assert!(g.has_containment());
    assert!(g.vertex(&vid("r")).contained);
    assert!(g.has_transitive());

    let rounds = remove_contained(&mut g, &UnusedComputer);

    assert_eq!(rounds, 1);
    assert!(!g.has_containment());
    assert!(!g.has_vertex(&vid("r")));
    assert_eq!(g.count_edges(&vid("s")), 1);
    assert_eq!(g.count_edges(&vid("q")), 1);
    assert!(g.vertices().all(|v| !v.contained));
    assert_twin_consistent(&g);
}

// ---- trim and islands ----

/// A circular triangle p-y-q (every side populated) plus a tip x hanging
/// off y.
fn triangle_with_tip() -> StringGraph {
    let region = genome(400, 17);
    let mut g = StringGraph::new(15, 0.0);
    for id in &["p", "y", "q", "x"] {
        add_read(&mut g, &region, id, 0, 100);
    }
    let side = |ida: &str, idb: &str| {
        Overlap::new(
            ida.into(),
            idb.into(),
            Match::new(
                SeqCoord::new(70, 99, 100),
                SeqCoord::new(0, 29, 100),
                false,
                0,
            ),
        )
    };
    create_edges_from_overlap(&mut g, &side("p", "y"), false).unwrap();
    create_edges_from_overlap(&mut g, &side("y", "q"), false).unwrap();
    create_edges_from_overlap(&mut g, &side("q", "p"), false).unwrap();
    // the tip overlaps y's start deeper than p does
    let tip = Overlap::new(
        "x".into(),
        "y".into(),
        Match::new(
            SeqCoord::new(60, 99, 100),
            SeqCoord::new(0, 39, 100),
            false,
            0,
        ),
    );
    create_edges_from_overlap(&mut g, &tip, false).unwrap();
    g
}

#[test]
fn trim_removes_the_tip_and_keeps_the_cycle() {
    let mut g = triangle_with_tip();
    assert_eq!(g.vertex_count(), 4);

    let mut pass = Trim::new();
    let changed = visit_graph(&mut g, &mut pass);

    assert!(changed);
    assert_eq!(pass.num_terminal, 1);
    assert_eq!(pass.num_island, 0);
    assert_eq!(pass.num_contig, 3);
    assert!(!g.has_vertex(&vid("x")));
    assert!(g.has_vertex(&vid("y")));
    assert_eq!(g.count_edges(&vid("y")), 2);
    assert_twin_consistent(&g);

    // a second pass finds nothing left to trim
    assert!(!visit_graph(&mut g, &mut Trim::new()));
    assert_eq!(g.vertex_count(), 3);
}

#[test]
fn islands_are_removed_once() {
    let mut g = transitive_chain();
    g.add_vertex("lonely".into(), genome(80, 23));

    let mut pass = IslandRemove::new();
    assert!(visit_graph(&mut g, &mut pass));
    assert_eq!(pass.removed, 1);
    assert!(!g.has_vertex(&vid("lonely")));
    assert_eq!(g.vertex_count(), 3);

    let mut again = IslandRemove::new();
    assert!(!visit_graph(&mut g, &mut again));
    assert_eq!(again.removed, 0);
    assert_eq!(g.vertex_count(), 3);
}

// ---- bubbles ----

#[test]
fn di_bubble_keeps_one_branch() {
    let region = genome(300, 29);
    let mut g = StringGraph::new(15, 0.0);
    add_read(&mut g, &region, "s", 0, 100);
    add_read(&mut g, &region, "a", 40, 100);
    add_read(&mut g, &region, "t", 80, 100);
    // b is a's sequence with one variant base
    let mut b_seq = region[40..140].to_vec();
    b_seq[70] = match b_seq[70] {
        b'A' => b'C',
        _ => b'A',
    };
    g.add_vertex("b".into(), b_seq);

    link(&mut g, ("s", 0, 100), ("a", 40, 100));
    link(&mut g, ("s", 0, 100), ("b", 40, 100));
    link(&mut g, ("a", 40, 100), ("t", 80, 100));
    link(&mut g, ("b", 40, 100), ("t", 80, 100));

    let mut pass = BubbleCollapse::new();
    visit_graph(&mut g, &mut pass);

    assert_eq!(pass.num_bubbles, 1);
    let survivors = [g.has_vertex(&vid("a")), g.has_vertex(&vid("b"))];
    assert_eq!(survivors.iter().filter(|&&kept| kept).count(), 1);
    // the path through the surviving branch is intact
    assert_eq!(g.count_edges(&vid("s")), 1);
    assert_eq!(g.count_edges(&vid("t")), 1);
    let mid = if survivors[0] { vid("a") } else { vid("b") };
    assert_eq!(g.count_edges(&mid), 2);
    assert!(g.check_colors(GraphColor::White));
    assert_twin_consistent(&g);
}

#[test]
fn edge_bubble_walk_collapses_the_short_branch() {
    let region = genome(300, 31);
    let mut g = StringGraph::new(5, 0.0);
    add_read(&mut g, &region, "x", 0, 100);
    add_read(&mut g, &region, "y", 40, 100);
    add_read(&mut g, &region, "z", 50, 100);
    add_read(&mut g, &region, "t", 90, 100);
    link(&mut g, ("x", 0, 100), ("y", 40, 100));
    link(&mut g, ("x", 0, 100), ("z", 50, 100));
    link(&mut g, ("y", 40, 100), ("t", 90, 100));
    link(&mut g, ("z", 50, 100), ("t", 90, 100));

    let mut pass = EdgeBubbleCollapse::default();
    visit_graph(&mut g, &mut pass);

    assert_eq!(pass.num_bubbles, 1);
    // one of the parallel branches is gone, and the walk x -> t still
    // exists through the other
    let survivors = [g.has_vertex(&vid("y")), g.has_vertex(&vid("z"))];
    assert_eq!(survivors.iter().filter(|&&kept| kept).count(), 1);
    let mid = if survivors[0] { vid("y") } else { vid("z") };
    assert_eq!(g.count_edges(&vid("x")), 1);
    assert_eq!(g.count_edges(&vid("t")), 1);
    assert_eq!(g.count_edges(&mid), 2);
    assert_eq!(g.edge_count(), 4);
    assert!(g.check_colors(GraphColor::White));
    assert_twin_consistent(&g);
}

// ---- small repeats ----

#[test]
fn small_repeat_edge_is_deleted() {
    let mut g = StringGraph::new(15, 0.0);
    let region = genome(400, 37);
    for id in &["x", "y", "z", "w"] {
        add_read(&mut g, &region, id, 0, 100);
    }
    let mk = |ida: &str, idb: &str, a: (usize, usize), b: (usize, usize)| {
        Overlap::new(
            ida.into(),
            idb.into(),
            Match::new(
                SeqCoord::new(a.0, a.1, 100),
                SeqCoord::new(b.0, b.1, 100),
                false,
                0,
            ),
        )
    };
    // x's suffix matches y's prefix over a 40bp repeat; the true
    // neighbors are z (for x) and w (for y), both with 90bp overlaps
    create_edges_from_overlap(&mut g, &mk("x", "y", (60, 99), (0, 39)), false).unwrap();
    create_edges_from_overlap(&mut g, &mk("x", "z", (10, 99), (0, 89)), false).unwrap();
    create_edges_from_overlap(&mut g, &mk("y", "w", (0, 89), (10, 99)), false).unwrap();

    let mut pass = SmallRepeatResolve::new(10);
    let changed = visit_graph(&mut g, &mut pass);

    assert!(changed);
    assert_eq!(pass.resolved, 1);
    assert_eq!(g.edge_count(), 4);
    // x keeps only z, y keeps only w
    let x_edges = g.edges_of(&vid("x"));
    assert_eq!(x_edges.len(), 1);
    assert_eq!(g.edge(x_edges[0]).end, vid("z"));
    let y_edges = g.edges_of(&vid("y"));
    assert_eq!(y_edges.len(), 1);
    assert_eq!(g.edge(y_edges[0]).end, vid("w"));
    assert_twin_consistent(&g);
}

// ---- duplicates ----

#[test]
fn duplicate_edge_pairs_are_swept() {
    let region = genome(200, 41);
    let mut g = StringGraph::new(15, 0.0);
    add_read(&mut g, &region, "a", 0, 100);
    add_read(&mut g, &region, "b", 40, 100);
    link(&mut g, ("a", 0, 100), ("b", 40, 100));
    link(&mut g, ("a", 0, 100), ("b", 40, 100));
    assert_eq!(g.edge_count(), 4);

    visit_graph(&mut g, &mut DuplicateRemove::new());

    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.count_edges(&vid("a")), 1);
    assert_eq!(g.count_edges(&vid("b")), 1);
    assert_twin_consistent(&g);
}

// ---- remodel and validate ----

struct FixtureComputer {
    sets: HashMap<VertexId, VertexOverlapSet>,
}

impl FixtureComputer {
    fn new() -> Self {
        FixtureComputer {
            sets: HashMap::new(),
        }
    }

    fn insert_irreducible(&mut self, vertex: &str, other: &str, ovr: Overlap) {
        let set = self
            .sets
            .entry(vertex.into())
            .or_insert_with(VertexOverlapSet::default);
        set.irreducible
            .insert(overlap_to_edge_desc(&other.into(), &ovr), ovr);
    }
}

impl OverlapComputer for FixtureComputer {
    fn irreducible_overlaps(
        &self,
        _graph: &StringGraph,
        vertex: &VertexId,
        _error_rate: f64,
        _min_overlap: usize,
    ) -> VertexOverlapSet {
        self.sets.get(vertex).cloned().unwrap_or_default()
    }

    fn remodel_for_excision(&self, _graph: &mut StringGraph, _vertex: &VertexId, _via: EdgeIx) {}
}

fn chain_computer() -> FixtureComputer {
    let mut computer = FixtureComputer::new();
    let ab = tiled_overlap(("a", 0, 100), ("b", 40, 100));
    let bc = tiled_overlap(("b", 40, 100), ("c", 80, 100));
    computer.insert_irreducible("a", "b", ab.clone());
    computer.insert_irreducible("b", "a", ab.swapped());
    computer.insert_irreducible("b", "c", bc.clone());
    computer.insert_irreducible("c", "b", bc.swapped());
    computer
}

#[test]
fn remodel_drops_edges_outside_the_irreducible_set() {
    let mut g = transitive_chain();
    let computer = chain_computer();

    let mut pass = Remodel::with_error_rate(&computer, 0.02);
    let changed = visit_graph(&mut g, &mut pass);

    assert!(!changed);
    assert_eq!(g.edge_count(), 4);
    assert_eq!(g.count_edges(&vid("a")), 1);
    assert!((g.error_rate() - 0.02).abs() < f64::EPSILON);
    assert_twin_consistent(&g);
}

#[test]
fn remodel_materializes_missing_irreducible_edges() {
    let mut g = transitive_chain();
    let first = g.edges_of(&vid("a"))[0];
    assert_eq!(g.edge(first).end, vid("b"));
    g.delete_edge_pair(first);
    assert_eq!(g.count_edges(&vid("a")), 1);

    let computer = chain_computer();
    let mut pass = Remodel::with_error_rate(&computer, 0.02);
    let changed = visit_graph(&mut g, &mut pass);

    assert!(changed);
    assert_eq!(g.edge_count(), 4);
    let a_edges = g.edges_of(&vid("a"));
    assert_eq!(a_edges.len(), 1);
    assert_eq!(g.edge(a_edges[0]).end, vid("b"));
    assert_twin_consistent(&g);
}

// ---- error correction ----

struct HomopolymerCorrector;

impl ErrorCorrector for HomopolymerCorrector {
    fn correct_vertex(
        &self,
        graph: &StringGraph,
        vertex: &VertexId,
        _k: usize,
        _error_rate: f64,
    ) -> Vec<u8> {
        vec![b'A'; graph.vertex(vertex).seq_len()]
    }
}

#[test]
fn error_correction_replaces_sequences() {
    let mut g = transitive_chain();
    let mut pass = ErrorCorrect::new(&HomopolymerCorrector, 5, 0.01);
    visit_graph(&mut g, &mut pass);

    assert_eq!(pass.corrected(), 3);
    assert!(g.vertices().all(|v| v.seq.iter().all(|&b| b == b'A')));
}

// ---- stats ----

#[test]
fn graph_stats_classify_the_reduced_chain() {
    let mut g = transitive_chain();
    visit_graph(&mut g, &mut TransitiveReduction::default());

    let mut stats = GraphStats::new();
    visit_graph(&mut g, &mut stats);

    assert_eq!(stats.num_vertex, 3);
    assert_eq!(stats.num_edges, 4);
    assert_eq!(stats.num_island, 0);
    assert_eq!(stats.num_terminal, 2);
    assert_eq!(stats.num_monobranch, 0);
    assert_eq!(stats.num_dibranch, 0);
    assert_eq!(stats.num_transitive, 3);
}

#[test]
fn edge_stats_find_the_removed_overlap_as_missing() {
    let mut g = transitive_chain();
    visit_graph(&mut g, &mut TransitiveReduction::default());
    g.set_error_rate(0.05);

    let mut stats = EdgeStats::new();
    visit_graph(&mut g, &mut stats);

    // each surviving edge half is seen from its start vertex
    assert_eq!(stats.found_total(), 4);
    // the a~c overlap is reachable by expansion from both ends
    assert_eq!(stats.missing_total(), 2);
    assert!(g.check_colors(GraphColor::White));
}

// ---- writers ----

#[test]
fn fasta_records_round_trip_exactly() {
    let mut g = StringGraph::new(15, 0.0);
    g.add_vertex("a".into(), b"ACGT".to_vec());
    g.add_vertex("b".into(), b"TTTT".to_vec());

    let mut pass = FastaWriter::new(Vec::new());
    visit_graph(&mut g, &mut pass);
    let out = pass.finish().expect("writing to a Vec cannot fail");

    assert_eq!(
        String::from_utf8(out).unwrap(),
        ">a 4 0\nACGT\n>b 4 0\nTTTT\n"
    );
}

#[test]
fn overlap_writer_emits_each_pair_once() {
    let region = genome(200, 43);
    let mut g = StringGraph::new(15, 0.0);
    add_read(&mut g, &region, "a", 0, 100);
    add_read(&mut g, &region, "b", 40, 100);
    let ovr = tiled_overlap(("a", 0, 100), ("b", 40, 100));
    create_edges_from_overlap(&mut g, &ovr, false).unwrap();

    let mut pass = OverlapWriter::new(Vec::new());
    visit_graph(&mut g, &mut pass);
    let out = String::from_utf8(pass.finish().unwrap()).unwrap();

    assert_eq!(out, format!("{}\n", ovr));
}

#[test]
fn break_writer_reports_tips_and_branches() {
    let mut g = triangle_with_tip();

    let mut pass = BreakWriter::new(Vec::new());
    visit_graph(&mut g, &mut pass);
    let out = String::from_utf8(pass.finish().unwrap()).unwrap();

    // x has a sense edge only, so its antisense side is the break
    assert!(out.contains("BREAK\tASTIP\tx\t"));
    // y's antisense side carries both p and the deeper tip overlap; the
    // margin between the two shortest overlaps is 40 - 30 = 10
    assert!(out.contains("BREAK\tASBRANCHED,10\ty\t"));
    assert!(!out.contains("ISLAND"));
}

// ---- whole pipeline ----

#[test]
fn a_full_pass_sequence_leaves_a_clean_skeleton() {
    let region = genome(500, 47);
    let mut g = StringGraph::new(15, 0.0);
    // a tiled backbone with one redundant overlap and one island
    let reads: &[(&str, usize)] = &[("r0", 0), ("r1", 40), ("r2", 80), ("r3", 120), ("r4", 160)];
    for &(id, off) in reads {
        add_read(&mut g, &region, id, off, 100);
    }
    for pair in reads.windows(2) {
        link(&mut g, (pair[0].0, pair[0].1, 100), (pair[1].0, pair[1].1, 100));
    }
    for pair in reads.windows(3) {
        link(&mut g, (pair[0].0, pair[0].1, 100), (pair[2].0, pair[2].1, 100));
    }
    g.add_vertex("island".into(), genome(90, 53));

    visit_graph(&mut g, &mut DuplicateRemove::new());
    visit_graph(&mut g, &mut TransitiveReduction::default());
    visit_graph(&mut g, &mut IslandRemove::new());

    // the backbone reduces to a simple path and the island is gone
    assert!(!g.has_vertex(&vid("island")));
    assert!(!g.has_transitive());
    assert_eq!(g.vertex_count(), 5);
    assert_eq!(g.edge_count(), 8);
    assert!(g.check_colors(GraphColor::White));
    assert_twin_consistent(&g);
    for pair in reads.windows(2) {
        let from = vid(pair[0].0);
        let found = g
            .edges_of(&from)
            .into_iter()
            .any(|ix| g.edge(ix).end == vid(pair[1].0));
        assert!(found, "backbone edge {} -> {} lost", pair[0].0, pair[1].0);
    }
}
