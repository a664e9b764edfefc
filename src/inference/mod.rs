pub mod encoder;

pub use encoder::SentenceEncoder;

/// Cosine similarity with a clamped denominator: degenerate (zero-norm)
/// vectors score 0.0 instead of dividing by zero.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut na = 0.0;
    let mut nb = 0.0;

    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }

    dot / (na.sqrt() * nb.sqrt()).max(1e-9)
}
