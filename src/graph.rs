/*!

The string graph container: a map from vertex id to vertex, an arena of
edge halves, and the global properties the simplification passes
coordinate through.

Vertices own their adjacency as a list of arena indices; twin pointers
are arena indices too, so a `sweep` is a single scan and edge-pair
deletion can never leave a dangling reference.

*/

use fnv::{FnvHashMap, FnvHashSet};

use rayon::prelude::*;

use crate::edge::{Edge, EdgeDesc, EdgeDir, EdgeIx, GraphColor, VertexId};

/// A read: its identity, sequence, and the adjacency of edge halves
/// anchored on it. Both directions share one list; direction-filtered
/// views preserve the list order.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub seq: Vec<u8>,
    pub color: GraphColor,
    /// Set by the graph algorithms when this read is a substring of
    /// another, never by input data directly.
    pub contained: bool,
    pub(crate) edges: Vec<EdgeIx>,
}

impl Vertex {
    pub fn new(id: VertexId, seq: Vec<u8>) -> Vertex {
        Vertex {
            id,
            seq,
            color: GraphColor::White,
            contained: false,
            edges: Vec::new(),
        }
    }

    pub fn seq_len(&self) -> usize {
        self.seq.len()
    }
}

/// A bidirected overlap graph over a set of reads.
#[derive(Debug)]
pub struct StringGraph {
    vertices: FnvHashMap<VertexId, Vertex>,
    edges: Vec<Option<Edge>>,
    free: Vec<usize>,
    error_rate: f64,
    min_overlap: usize,
    has_containment: bool,
    has_transitive: bool,
    exact_mode: bool,
}

impl StringGraph {
    /// An empty graph. A freshly loaded overlap graph is assumed complete,
    /// so the transitive flag starts set.
    pub fn new(min_overlap: usize, error_rate: f64) -> StringGraph {
        StringGraph {
            vertices: FnvHashMap::default(),
            edges: Vec::new(),
            free: Vec::new(),
            error_rate,
            min_overlap,
            has_containment: false,
            has_transitive: true,
            exact_mode: false,
        }
    }

    // ---- vertices ----

    pub fn add_vertex(&mut self, id: VertexId, seq: Vec<u8>) {
        let old = self.vertices.insert(id.clone(), Vertex::new(id.clone(), seq));
        if old.is_some() {
            panic!("tried to add a duplicate vertex: {}", id);
        }
    }

    pub fn has_vertex(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn get_vertex(&self, id: &VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn vertex(&self, id: &VertexId) -> &Vertex {
        self.vertices
            .get(id)
            .unwrap_or_else(|| panic!("no vertex with id {}", id))
    }

    pub fn vertex_mut(&mut self, id: &VertexId) -> &mut Vertex {
        self.vertices
            .get_mut(id)
            .unwrap_or_else(|| panic!("no vertex with id {}", id))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Snapshot of all vertex ids in sorted order; passes iterate this so
    /// a pass sees one stable order even while it recolors the graph.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        let mut ids: Vec<VertexId> = self.vertices.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn set_contained(&mut self, id: &VertexId, contained: bool) {
        self.vertex_mut(id).contained = contained;
    }

    // ---- edges ----

    pub fn edge(&self, ix: EdgeIx) -> &Edge {
        self.edges[ix.0]
            .as_ref()
            .unwrap_or_else(|| panic!("edge {:?} has been deleted", ix))
    }

    pub fn edge_mut(&mut self, ix: EdgeIx) -> &mut Edge {
        self.edges[ix.0]
            .as_mut()
            .unwrap_or_else(|| panic!("edge {:?} has been deleted", ix))
    }

    /// Number of live edge halves; twice the undirected edge count.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIx> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(n, _)| EdgeIx(n))
    }

    /// Insert a twin pair of edge halves. The halves arrive with unset
    /// twin pointers; they are patched here, atomically with insertion.
    pub fn create_edge_pair(&mut self, mut e0: Edge, mut e1: Edge) -> (EdgeIx, EdgeIx) {
        assert!(
            self.has_vertex(&e0.start) && self.has_vertex(&e1.start),
            "edge pair references a missing vertex"
        );
        debug_assert!(e0.start == e1.end && e1.start == e0.end);

        let i0 = self.alloc_slot();
        let i1 = self.alloc_slot();
        e0.twin = i1;
        e1.twin = i0;

        let (v0, v1) = (e0.start.clone(), e1.start.clone());
        self.vertex_mut(&v0).edges.push(i0);
        self.vertex_mut(&v1).edges.push(i1);
        self.edges[i0.0] = Some(e0);
        self.edges[i1.0] = Some(e1);
        (i0, i1)
    }

    fn alloc_slot(&mut self) -> EdgeIx {
        match self.free.pop() {
            Some(n) => EdgeIx(n),
            None => {
                self.edges.push(None);
                EdgeIx(self.edges.len() - 1)
            }
        }
    }

    /// Delete an edge half and its twin.
    pub fn delete_edge_pair(&mut self, ix: EdgeIx) {
        let twin = self.edge(ix).twin;
        self.delete_half(ix);
        self.delete_half(twin);
    }

    fn delete_half(&mut self, ix: EdgeIx) {
        let e = self.edges[ix.0]
            .take()
            .unwrap_or_else(|| panic!("edge {:?} deleted twice", ix));
        if let Some(v) = self.vertices.get_mut(&e.start) {
            v.edges.retain(|&i| i != ix);
        }
        self.free.push(ix.0);
    }

    /// Delete every edge pair incident to a vertex.
    pub fn delete_vertex_edges(&mut self, id: &VertexId) {
        while let Some(&ix) = self.vertex(id).edges.first() {
            self.delete_edge_pair(ix);
        }
    }

    /// All edge halves anchored on `id`, in adjacency order.
    pub fn edges_of(&self, id: &VertexId) -> Vec<EdgeIx> {
        self.vertex(id).edges.clone()
    }

    /// Edge halves anchored on `id` going in `dir`, in adjacency order.
    pub fn edges_dir(&self, id: &VertexId, dir: EdgeDir) -> Vec<EdgeIx> {
        self.vertex(id)
            .edges
            .iter()
            .copied()
            .filter(|&ix| self.edge(ix).dir == dir)
            .collect()
    }

    pub fn count_edges(&self, id: &VertexId) -> usize {
        self.vertex(id).edges.len()
    }

    pub fn count_edges_dir(&self, id: &VertexId, dir: EdgeDir) -> usize {
        self.vertex(id)
            .edges
            .iter()
            .filter(|&&ix| self.edge(ix).dir == dir)
            .count()
    }

    /// Color any repeated `EdgeDesc` among `id`'s out-edges (keeping the
    /// first occurrence), twin included. Returns whether any was found.
    pub fn mark_duplicate_edges(&mut self, id: &VertexId, color: GraphColor) -> bool {
        let list = self.edges_of(id);
        let mut seen: FnvHashSet<EdgeDesc> = FnvHashSet::default();
        let mut found = false;
        for ix in list {
            let desc = self.edge(ix).desc();
            if !seen.insert(desc) {
                let twin = self.edge(ix).twin;
                self.edge_mut(ix).color = color;
                self.edge_mut(twin).color = color;
                found = true;
            }
        }
        found
    }

    // ---- bulk operations ----

    /// Set every vertex and live edge to one color.
    pub fn set_colors(&mut self, color: GraphColor) {
        self.vertices
            .par_iter_mut()
            .for_each(|(_, v)| v.color = color);
        for slot in self.edges.iter_mut() {
            if let Some(e) = slot {
                e.color = color;
            }
        }
    }

    /// Whether every vertex and live edge carries `color`.
    pub fn check_colors(&self, color: GraphColor) -> bool {
        self.vertices.values().all(|v| v.color == color)
            && self.edges.iter().flatten().all(|e| e.color == color)
    }

    /// Sort every adjacency list ascending by edge `seq_len`. The
    /// reduction passes require this order; direction-filtered views of a
    /// sorted list are themselves sorted.
    pub fn sort_adj_by_len(&mut self) {
        let edges = &self.edges;
        self.vertices.par_iter_mut().for_each(|(_, v)| {
            v.edges.sort_by_key(|ix| {
                edges[ix.0]
                    .as_ref()
                    .unwrap_or_else(|| panic!("adjacency holds a deleted edge {:?}", ix))
                    .seq_len
            });
        });
    }

    /// Remove every edge pair whose halves carry `color`. Returns the
    /// number of halves removed.
    pub fn sweep_edges(&mut self, color: GraphColor) -> usize {
        let mut removed = 0;
        for n in 0..self.edges.len() {
            let doomed = match &self.edges[n] {
                Some(e) => e.color == color,
                None => false,
            };
            if doomed {
                let ix = EdgeIx(n);
                debug_assert_eq!(
                    self.edge(self.edge(ix).twin).color,
                    color,
                    "edge marked for sweep without its twin"
                );
                self.delete_edge_pair(ix);
                removed += 2;
            }
        }
        removed
    }

    /// Remove every vertex carrying `color`, together with all incident
    /// edge pairs. Returns the number of vertices removed.
    pub fn sweep_vertices(&mut self, color: GraphColor) -> usize {
        let doomed: Vec<VertexId> = self
            .vertices
            .values()
            .filter(|v| v.color == color)
            .map(|v| v.id.clone())
            .collect();
        for id in &doomed {
            self.delete_vertex_edges(id);
            self.vertices.remove(id);
        }
        doomed.len()
    }

    // ---- global properties ----

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    pub fn set_error_rate(&mut self, error_rate: f64) {
        self.error_rate = error_rate;
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    pub fn set_min_overlap(&mut self, min_overlap: usize) {
        self.min_overlap = min_overlap;
    }

    pub fn has_containment(&self) -> bool {
        self.has_containment
    }

    pub fn set_containment_flag(&mut self, flag: bool) {
        self.has_containment = flag;
    }

    pub fn has_transitive(&self) -> bool {
        self.has_transitive
    }

    pub fn set_transitive_flag(&mut self, flag: bool) {
        self.has_transitive = flag;
    }

    pub fn is_exact_mode(&self) -> bool {
        self.exact_mode
    }

    pub fn set_exact_mode(&mut self, exact: bool) {
        self.exact_mode = exact;
    }
}
