use std::collections::BTreeMap;

use log::{debug, info};

use crate::algebra::{has_transitive_overlap, infer_transitive_overlap};
use crate::edge::{EdgeDir, GraphColor, VertexId};
use crate::graph::StringGraph;
use crate::overlap::Overlap;
use crate::visitor::Visitor;

/// Summary statistics over the graph topology.
#[derive(Debug, Default)]
pub struct GraphStats {
    pub num_island: usize,
    pub num_terminal: usize,
    pub num_monobranch: usize,
    pub num_dibranch: usize,
    pub num_transitive: usize,
    pub num_edges: usize,
    pub num_vertex: usize,
    pub sum_edge_len: usize,
}

impl GraphStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for GraphStats {
    fn previsit(&mut self, _graph: &mut StringGraph) {
        *self = GraphStats::default();
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let s_count = graph.count_edges_dir(vertex, EdgeDir::Sense);
        let as_count = graph.count_edges_dir(vertex, EdgeDir::Antisense);

        if s_count == 0 && as_count == 0 {
            self.num_island += 1;
        } else if s_count == 0 || as_count == 0 {
            self.num_terminal += 1;
        }

        if s_count > 1 && as_count > 1 {
            self.num_dibranch += 1;
        } else if s_count > 1 || as_count > 1 {
            self.num_monobranch += 1;
        }

        if s_count == 1 || as_count == 1 {
            self.num_transitive += 1;
        }

        self.num_edges += s_count + as_count;
        self.num_vertex += 1;

        for ix in graph.edges_of(vertex) {
            self.sum_edge_len += graph.edge(ix).seq_len;
        }
        false
    }

    fn postvisit(&mut self, _graph: &mut StringGraph) {
        info!(
            "island: {} terminal: {} monobranch: {} dibranch: {} transitive: {}",
            self.num_island,
            self.num_terminal,
            self.num_monobranch,
            self.num_dibranch,
            self.num_transitive
        );
        info!(
            "total vertices: {} total edges: {} sum edge length: {}",
            self.num_vertex, self.num_edges, self.sum_edge_len
        );
    }
}

/// Histogram over (overlap length, differences), keyed by overlap length.
type CountMatrix = BTreeMap<usize, BTreeMap<usize, usize>>;

/// Histograms of the overlaps present in the graph and of candidate
/// overlaps a one-step expansion through each neighborhood would add.
/// Candidates below the graph's error rate count as potentially missed
/// edges.
#[derive(Debug, Default)]
pub struct EdgeStats {
    pub max_diff: usize,
    pub min_overlap: usize,
    pub max_overlap: usize,
    found_counts: CountMatrix,
    missing_counts: CountMatrix,
    visited: usize,
}

impl EdgeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found_total(&self) -> usize {
        self.found_counts.values().flat_map(|row| row.values()).sum()
    }

    pub fn missing_total(&self) -> usize {
        self.missing_counts.values().flat_map(|row| row.values()).sum()
    }

    fn add_overlap_to_count(&mut self, overlap_len: usize, num_diff: usize, found: bool) {
        let matrix = if found {
            &mut self.found_counts
        } else {
            &mut self.missing_counts
        };
        *matrix
            .entry(overlap_len)
            .or_insert_with(BTreeMap::new)
            .entry(num_diff)
            .or_insert(0) += 1;

        self.max_diff = self.max_diff.max(num_diff);
        self.max_overlap = self.max_overlap.max(overlap_len);
    }

    /// Candidate overlaps reachable by composing each edge with its
    /// neighbor's edges. Endpoints already adjacent are black-marked so
    /// each candidate appears once; all colors are restored before
    /// returning.
    fn missing_candidates(
        &self,
        graph: &mut StringGraph,
        vertex: &VertexId,
        min_overlap: usize,
    ) -> Vec<(VertexId, Overlap)> {
        let mut out: Vec<(VertexId, Overlap)> = Vec::new();

        let edges = graph.edges_of(vertex);
        for &ix in &edges {
            let end = graph.edge(ix).end.clone();
            graph.vertex_mut(&end).color = GraphColor::Black;
        }
        graph.vertex_mut(vertex).color = GraphColor::Black;

        for &xy in &edges {
            let y = graph.edge(xy).end.clone();
            for yz in graph.edges_of(&y) {
                let z = graph.edge(yz).end.clone();
                if graph.vertex(&z).color == GraphColor::Black {
                    continue;
                }
                let ovr_xy = graph.edge(xy).overlap.clone();
                let ovr_yz = graph.edge(yz).overlap.clone();
                if has_transitive_overlap(&ovr_xy, &ovr_yz) {
                    let ovr_xz = infer_transitive_overlap(&ovr_xy, &ovr_yz);
                    if ovr_xz.min_overlap_length() >= min_overlap {
                        graph.vertex_mut(&z).color = GraphColor::Black;
                        out.push((z, ovr_xz));
                    }
                }
            }
        }

        for &ix in &edges {
            let end = graph.edge(ix).end.clone();
            graph.vertex_mut(&end).color = GraphColor::White;
        }
        graph.vertex_mut(vertex).color = GraphColor::White;
        for (z, _) in &out {
            graph.vertex_mut(z).color = GraphColor::White;
        }
        out
    }

    fn log_counts(&self, title: &str, found: bool) {
        let matrix = if found {
            &self.found_counts
        } else {
            &self.missing_counts
        };
        info!("{}", title);

        let mut header = String::from("OL");
        for j in 0..=self.max_diff {
            header.push_str(&format!("\t{}", j));
        }
        header.push_str("\tsum");
        info!("{}", header);

        let mut column_total: Vec<usize> = vec![0; self.max_diff + 1];
        for ol in self.min_overlap..=self.max_overlap {
            let mut row = format!("{}", ol);
            let mut sum = 0;
            for j in 0..=self.max_diff {
                let v = matrix
                    .get(&ol)
                    .and_then(|r| r.get(&j))
                    .copied()
                    .unwrap_or(0);
                row.push_str(&format!("\t{}", v));
                sum += v;
                column_total[j] += v;
            }
            row.push_str(&format!("\t{}", sum));
            info!("{}", row);
        }

        let mut totals = String::from("total");
        let mut total = 0;
        for v in column_total {
            totals.push_str(&format!("\t{}", v));
            total += v;
        }
        totals.push_str(&format!("\t{}", total));
        info!("{}", totals);
    }
}

impl Visitor for EdgeStats {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.set_colors(GraphColor::White);
        self.max_diff = 0;
        self.min_overlap = graph.min_overlap();
        self.max_overlap = 0;
        self.found_counts.clear();
        self.missing_counts.clear();
        self.visited = 0;
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let min_overlap = graph.min_overlap();
        let max_error = graph.error_rate();

        self.visited += 1;
        if self.visited % 50_000 == 0 {
            debug!("visited: {}", self.visited);
        }

        for ix in graph.edges_of(vertex) {
            let end = graph.edge(ix).end.clone();
            let ovr = graph.edge(ix).overlap.clone();
            let num_diff = ovr
                .mat
                .count_differences(&graph.vertex(vertex).seq, &graph.vertex(&end).seq);
            self.add_overlap_to_count(ovr.min_overlap_length(), num_diff, true);
        }

        let candidates = self.missing_candidates(graph, vertex, min_overlap);
        for (endpoint, ovr) in candidates {
            let num_diff = ovr
                .mat
                .count_differences(&graph.vertex(vertex).seq, &graph.vertex(&endpoint).seq);
            let error_rate = num_diff as f64 / ovr.min_overlap_length() as f64;
            if error_rate < max_error {
                self.add_overlap_to_count(ovr.min_overlap_length(), num_diff, false);
            }
        }
        false
    }

    fn postvisit(&mut self, _graph: &mut StringGraph) {
        self.log_counts("found overlaps", true);
        self.log_counts("potentially missing overlaps", false);
    }
}
