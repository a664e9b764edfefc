use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use super::dto::{EmbedResponse, HealthResponse, InfoResponse, SimilarityResponse};
use super::error::ApiError;
use crate::inference::{
    cosine,
    encoder::{DESCRIPTION, LANGUAGE, MODEL_ID},
};
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Response {
    match state.encoder {
        Some(_) => Json(HealthResponse {
            status: "healthy",
            model: MODEL_ID,
            language: LANGUAGE,
        })
        .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "message": "Model not loaded" })),
        )
            .into_response(),
    }
}

pub async fn info(State(state): State<AppState>) -> Result<Json<InfoResponse>, ApiError> {
    let encoder = state.encoder.as_ref().ok_or(ApiError::ModelUnavailable)?;

    Ok(Json(InfoResponse {
        model: MODEL_ID,
        language: LANGUAGE,
        max_seq_length: encoder.max_seq_length(),
        dimension: encoder.dimension(),
        device: encoder.device_label(),
        description: DESCRIPTION,
    }))
}

pub async fn embed(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let encoder = state.encoder.as_ref().ok_or(ApiError::ModelUnavailable)?;
    let inputs = parse_embed_inputs(&body)?;

    info!("processing {} inputs", inputs.len());

    let embeddings = encoder.embed_batch(&inputs).map_err(|err| {
        error!("embedding failed: {err:#}");
        ApiError::Inference(err)
    })?;
    let dimension = embeddings.first().map(Vec::len).unwrap_or(0);

    Ok(Json(EmbedResponse {
        embeddings,
        model: MODEL_ID,
        language: LANGUAGE,
        dimension,
    }))
}

pub async fn similarity(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SimilarityResponse>, ApiError> {
    let encoder = state.encoder.as_ref().ok_or(ApiError::ModelUnavailable)?;
    let (text1, text2) = parse_similarity_texts(&body)?;

    info!("scoring similarity of 2 texts");

    let emb1 = encoder.embed(text1).map_err(|err| {
        error!("similarity embedding failed: {err:#}");
        ApiError::Inference(err)
    })?;
    let emb2 = encoder.embed(text2).map_err(|err| {
        error!("similarity embedding failed: {err:#}");
        ApiError::Inference(err)
    })?;

    Ok(Json(SimilarityResponse {
        similarity: cosine(&emb1, &emb2),
        model: MODEL_ID,
        language: LANGUAGE,
    }))
}

/// `inputs` must be present and a list of strings; checked before the model
/// is ever consulted.
fn parse_embed_inputs(body: &Value) -> Result<Vec<String>, ApiError> {
    let inputs = body
        .get("inputs")
        .ok_or_else(|| ApiError::Validation("Missing 'inputs' field".into()))?;
    let items = inputs
        .as_array()
        .ok_or_else(|| ApiError::Validation("'inputs' must be a list".into()))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| ApiError::Validation("'inputs' must be a list of strings".into()))
        })
        .collect()
}

fn parse_similarity_texts(body: &Value) -> Result<(&str, &str), ApiError> {
    let text1 = body.get("text1").and_then(Value::as_str);
    let text2 = body.get("text2").and_then(Value::as_str);

    match (text1, text2) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ApiError::Validation(
            "Missing 'text1' and 'text2' fields".into(),
        )),
    }
}
