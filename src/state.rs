use std::sync::Arc;

use crate::inference::SentenceEncoder;

/// Shared handler state. The encoder is written once at startup and never
/// replaced; `None` means the model was not loaded, and every handler checks
/// that before doing anything else.
#[derive(Clone)]
pub struct AppState {
    pub encoder: Option<Arc<SentenceEncoder>>,
}

impl AppState {
    pub fn ready(encoder: Arc<SentenceEncoder>) -> Self {
        Self {
            encoder: Some(encoder),
        }
    }

    pub fn unloaded() -> Self {
        Self { encoder: None }
    }
}
