use log::info;

use crate::algebra::ErrorCorrector;
use crate::edge::VertexId;
use crate::graph::StringGraph;
use crate::visitor::Visitor;

/// Run the external error corrector over every read, replacing each
/// vertex sequence with the corrected form.
pub struct ErrorCorrect<'a, E: ErrorCorrector + ?Sized> {
    corrector: &'a E,
    pub k: usize,
    pub error_rate: f64,
    corrected: usize,
}

impl<'a, E: ErrorCorrector + ?Sized> ErrorCorrect<'a, E> {
    pub fn new(corrector: &'a E, k: usize, error_rate: f64) -> Self {
        ErrorCorrect {
            corrector,
            k,
            error_rate,
            corrected: 0,
        }
    }

    pub fn corrected(&self) -> usize {
        self.corrected
    }
}

impl<'a, E: ErrorCorrector + ?Sized> Visitor for ErrorCorrect<'a, E> {
    fn visit(&mut self, graph: &mut StringGraph, vertex: &VertexId) -> bool {
        if self.corrected > 0 && self.corrected % 50_000 == 0 {
            info!("corrected {} reads", self.corrected);
        }

        let corrected = self
            .corrector
            .correct_vertex(graph, vertex, self.k, self.error_rate);
        graph.vertex_mut(vertex).seq = corrected;
        self.corrected += 1;
        false
    }
}
