//! Normalized embedding vectors for semantic similarity

#[derive(Debug, Clone)]
pub struct Embedding(Vec<f32>);

impl Embedding {
	/// Create normalized embedding from raw data
	pub fn new(data: Vec<f32>) -> Self {
		Self(normalize(&data))
	}

	pub fn dim(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Cosine similarity [-1.0, 1.0]
	pub fn similarity(&self, other: &Self) -> f32 {
		self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
	}

	/// Cosine distance clamped to [0.0, 1.0] (0.0 = identical)
	pub fn distance(&self, other: &Self) -> f32 {
		(1.0 - self.similarity(other)).clamp(0.0, 1.0)
	}
}

fn normalize(v: &[f32]) -> Vec<f32> {
	let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
	if norm > 0.0 {
		v.iter().map(|x| x / norm).collect()
	} else {
		v.to_vec()
	}
}
