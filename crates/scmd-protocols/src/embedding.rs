//! Fixed-dimension embedding vectors.

/// An embedding vector.
///
/// Vectors coming from a provider must go through [`Embedding::normalized`]
/// so that everything stored or queried has the configured dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    vector: Vec<f32>,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }

    /// Truncate or zero-pad `raw` to exactly `dimension` components.
    pub fn normalized(mut raw: Vec<f32>, dimension: usize) -> Self {
        raw.resize(dimension, 0.0);
        Self { vector: raw }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.vector
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.vector
    }

    /// Compute cosine similarity with another embedding.
    ///
    /// Mismatched dimensions and zero vectors compare as 0.
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        if self.dimension() != other.dimension() {
            return 0.0;
        }

        let dot: f32 = self
            .vector
            .iter()
            .zip(other.vector.iter())
            .map(|(a, b)| a * b)
            .sum();

        let norm_a: f32 = self.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.vector.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }

    /// Cosine distance, `1 - similarity`.
    pub fn cosine_distance(&self, other: &Self) -> f32 {
        1.0 - self.cosine_similarity(other)
    }
}

#[cfg(test)]
#[path = "embedding_tests.rs"]
mod tests;
