use std::io::{self, Write};

use bstr::ByteSlice;

use crate::edge::{EdgeDir, VertexId};
use crate::graph::StringGraph;
use crate::visitor::Visitor;

/// Emit every vertex as a FASTA record: `>ID LEN 0` then the sequence.
pub struct FastaWriter<W: Write> {
    writer: W,
    status: io::Result<()>,
}

impl<W: Write> FastaWriter<W> {
    pub fn new(writer: W) -> Self {
        FastaWriter {
            writer,
            status: Ok(()),
        }
    }

    /// Hand back the underlying writer, or the first I/O error hit
    /// during the pass.
    pub fn finish(self) -> io::Result<W> {
        let status = self.status;
        let writer = self.writer;
        status.map(|_| writer)
    }
}

impl<W: Write> Visitor for FastaWriter<W> {
    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        if self.status.is_ok() {
            let v = graph.vertex(vertex);
            self.status = write!(
                self.writer,
                ">{} {} 0\n{}\n",
                v.id,
                v.seq_len(),
                v.seq.as_bstr()
            );
        }
        false
    }
}

/// Emit every undirected overlap once, in its canonical one-line text
/// form; the twin half is skipped by only writing when the first id
/// sorts below the second.
pub struct OverlapWriter<W: Write> {
    writer: W,
    status: io::Result<()>,
}

impl<W: Write> OverlapWriter<W> {
    pub fn new(writer: W) -> Self {
        OverlapWriter {
            writer,
            status: Ok(()),
        }
    }

    pub fn finish(self) -> io::Result<W> {
        let status = self.status;
        let writer = self.writer;
        status.map(|_| writer)
    }
}

impl<W: Write> Visitor for OverlapWriter<W> {
    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        for ix in graph.edges_of(vertex) {
            if self.status.is_err() {
                break;
            }
            let ovr = &graph.edge(ix).overlap;
            if ovr.id[0] < ovr.id[1] {
                self.status = writeln!(self.writer, "{}", ovr);
            }
        }
        false
    }
}

/// Emit a typed break record for every place a contig walk would have to
/// stop: islands, tips on either side, and branches (with the margin
/// between the two shortest overlap lengths on the branching side).
pub struct BreakWriter<W: Write> {
    writer: W,
    status: io::Result<()>,
}

impl<W: Write> BreakWriter<W> {
    pub fn new(writer: W) -> Self {
        BreakWriter {
            writer,
            status: Ok(()),
        }
    }

    pub fn finish(self) -> io::Result<W> {
        let status = self.status;
        let writer = self.writer;
        status.map(|_| writer)
    }

    fn write_break(&mut self, kind: &str, graph: &StringGraph, vertex: &VertexId) {
        if self.status.is_ok() {
            let v = graph.vertex(vertex);
            self.status = writeln!(
                self.writer,
                "BREAK\t{}\t{}\t{}",
                kind,
                v.id,
                v.seq.as_bstr()
            );
        }
    }

    /// Margin between the two shortest overlap lengths on one side;
    /// assumes sorted adjacency, where the shortest overlap sits last.
    fn overlap_length_difference(graph: &StringGraph, vertex: &VertexId, dir: EdgeDir) -> isize {
        let edges = graph.edges_dir(vertex, dir);
        if edges.len() < 2 {
            return 0;
        }
        let shortest = graph.edge(edges[edges.len() - 1]).overlap_length(0) as isize;
        let second = graph.edge(edges[edges.len() - 2]).overlap_length(0) as isize;
        second - shortest
    }
}

impl<W: Write> Visitor for BreakWriter<W> {
    fn previsit(&mut self, graph: &mut StringGraph) {
        graph.sort_adj_by_len();
    }

    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        let s_count = graph.count_edges_dir(vertex, EdgeDir::Sense);
        let as_count = graph.count_edges_dir(vertex, EdgeDir::Antisense);

        if s_count == 0 && as_count == 0 {
            self.write_break("ISLAND", graph, vertex);
        } else if s_count == 0 {
            self.write_break("STIP", graph, vertex);
        } else if as_count == 0 {
            self.write_break("ASTIP", graph, vertex);
        }

        if s_count > 1 {
            let delta = Self::overlap_length_difference(graph, vertex, EdgeDir::Sense);
            self.write_break(&format!("SBRANCHED,{}", delta), graph, vertex);
        }
        if as_count > 1 {
            let delta = Self::overlap_length_difference(graph, vertex, EdgeDir::Antisense);
            self.write_break(&format!("ASBRANCHED,{}", delta), graph, vertex);
        }
        false
    }
}
