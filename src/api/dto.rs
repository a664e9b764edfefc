use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: &'static str,
    pub language: &'static str,
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub model: &'static str,
    pub language: &'static str,
    pub max_seq_length: usize,
    pub dimension: usize,
    pub device: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
    pub model: &'static str,
    pub language: &'static str,
    pub dimension: usize,
}

#[derive(Serialize)]
pub struct SimilarityResponse {
    pub similarity: f32,
    pub model: &'static str,
    pub language: &'static str,
}
