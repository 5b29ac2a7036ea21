use quickcheck::quickcheck;

use stringgraph::algebra::create_edges_from_overlap;
use stringgraph::visitors::TransitiveReduction;
use stringgraph::{visit_graph, GraphColor, Match, Overlap, SeqCoord, StringGraph};

const READ_LEN: usize = 100;
const MIN_OVERLAP: usize = 20;

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

/// Tile reads over a random region at strictly increasing offsets and
/// create an edge for every pair that overlaps by at least the minimum.
/// Strictly increasing offsets with one read length mean no containments.
fn tiled_graph(raw_steps: &[u16]) -> StringGraph {
    let mut offsets = vec![0usize];
    for r in raw_steps.iter().take(12) {
        let step = 1 + (*r as usize % (READ_LEN - MIN_OVERLAP));
        let next = offsets.last().unwrap() + step;
        offsets.push(next);
    }

    let region = genome(offsets.last().unwrap() + READ_LEN, 59);
    let mut g = StringGraph::new(MIN_OVERLAP, 0.0);
    for (n, off) in offsets.iter().enumerate() {
        g.add_vertex(
            format!("read{:03}", n).into(),
            region[*off..*off + READ_LEN].to_vec(),
        );
    }

    for i in 0..offsets.len() {
        for j in (i + 1)..offsets.len() {
            let (off_a, off_b) = (offsets[i], offsets[j]);
            let s = off_a.max(off_b);
            let e = (off_a + READ_LEN).min(off_b + READ_LEN);
            if s + MIN_OVERLAP > e {
                continue;
            }
            let ovr = Overlap::new(
                format!("read{:03}", i).into(),
                format!("read{:03}", j).into(),
                Match::new(
                    SeqCoord::new(s - off_a, e - 1 - off_a, READ_LEN),
                    SeqCoord::new(s - off_b, e - 1 - off_b, READ_LEN),
                    false,
                    0,
                ),
            );
            create_edges_from_overlap(&mut g, &ovr, false)
                .expect("tiled overlaps are never containments");
        }
    }
    g
}

fn twins_consistent(g: &StringGraph) -> bool {
    g.edge_indices().all(|ix| {
        let e = g.edge(ix);
        let t = g.edge(e.twin);
        t.twin == ix
            && t.start == e.end
            && t.end == e.start
            && g.edges_of(&e.start).contains(&ix)
            && g.edges_of(&t.start).contains(&e.twin)
    })
}

fn adjacency_matches_arena(g: &StringGraph) -> bool {
    let listed: usize = g.vertices().map(|v| g.count_edges(&v.id)).sum();
    listed == g.edge_count()
}

quickcheck! {
    fn tiled_graphs_are_twin_consistent(raw: Vec<u16>) -> bool {
        let g = tiled_graph(&raw);
        twins_consistent(&g) && adjacency_matches_arena(&g)
    }

    fn transitive_reduction_reaches_a_fixed_point(raw: Vec<u16>) -> bool {
        let mut g = tiled_graph(&raw);

        visit_graph(&mut g, &mut TransitiveReduction::default());
        let reduced = g.edge_count();
        let clean = g.check_colors(GraphColor::White) && !g.has_transitive();

        let mut second = TransitiveReduction::default();
        visit_graph(&mut g, &mut second);

        clean
            && second.marked_edges() == 0
            && g.edge_count() == reduced
            && twins_consistent(&g)
    }
}
