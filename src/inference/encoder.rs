use anyhow::{anyhow, Context, Result};
use candle::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use std::{fs, path::{Path, PathBuf}};
use tokenizers::Tokenizer;
use tracing::info;

pub const MODEL_ID: &str = "radlab/polish-bi-encoder-mean";
pub const LANGUAGE: &str = "polish";
pub const DESCRIPTION: &str = "Polish sentence embeddings model - bi-encoder with mean pooling";

const SNAPSHOT_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];

/// Bi-encoder over a BERT backbone with mean pooling. Loaded once at startup
/// and shared read-only across requests; `forward` takes `&self`, so no lock
/// is needed around concurrent inference.
pub struct SentenceEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    max_len: usize,
}

impl SentenceEncoder {
    /// Load from `POLISH_EMBED_MODEL_DIR` if set, otherwise pull the
    /// hf-hub snapshot of the published model.
    pub fn load() -> Result<Self> {
        let snapshot_dir = match std::env::var("POLISH_EMBED_MODEL_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => download_snapshot()?,
        };
        Self::from_dir(&snapshot_dir)
    }

    pub fn from_dir(snapshot_dir: &Path) -> Result<Self> {
        let device = Device::cuda_if_available(0)?;
        info!("loading {MODEL_ID} from {}", snapshot_dir.display());

        let tokenizer_path = snapshot_dir.join("tokenizer.json");
        if !tokenizer_path.exists() {
            return Err(anyhow!(
                "tokenizer.json not found under {}",
                snapshot_dir.display()
            ));
        }
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Tokenizer load failed ({}): {e}", tokenizer_path.display()))?;

        let config: BertConfig =
            serde_json::from_slice(&fs::read(snapshot_dir.join("config.json"))?)
                .context("failed to parse config.json")?;
        let hidden_size = config.hidden_size;
        let max_len = config.max_position_embeddings.saturating_sub(2).max(16);

        let weights = snapshot_dir.join("model.safetensors");
        if !weights.exists() {
            return Err(anyhow!("model.safetensors not found in {:?}", snapshot_dir));
        }

        // Load weights (mmaped)
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)? };
        let model = BertModel::load(vb, &config)?;

        info!("{MODEL_ID} ready on {}", device_label(&device));

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size,
            max_len,
        })
    }

    /// Embed a single text: tokenize, forward, mean-pool over the token axis.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let enc = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("tokenizer encode error: {e}"))?;

        let mut ids = enc.get_ids().to_vec();
        ids.truncate(self.max_len);
        let seq_len = ids.len();

        let input = Tensor::new(ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let mask = Tensor::ones((1, seq_len), DType::U32, &self.device)?;
        let token_type_ids = Tensor::zeros((1, seq_len), DType::U32, &self.device)?;

        let hidden = self
            .model
            .forward(&input, &token_type_ids, Some(&mask))
            .context("bi-encoder forward pass failed")?;

        // Mean pooling: the sequence is unpadded, so a plain mean over the
        // token axis equals the masked mean.
        let pooled = (hidden.sum(1)? / (seq_len as f64))?;
        let embedding = pooled.squeeze(0)?.to_vec1::<f32>()?;

        Ok(embedding)
    }

    /// One embedding per input, same order. Texts are encoded one at a time;
    /// there is no batching here.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text)?);
        }
        Ok(embeddings)
    }

    pub fn dimension(&self) -> usize {
        self.hidden_size
    }

    pub fn max_seq_length(&self) -> usize {
        self.max_len
    }

    pub fn device_label(&self) -> &'static str {
        device_label(&self.device)
    }
}

fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda:0",
        Device::Metal(_) => "metal",
    }
}

fn download_snapshot() -> Result<PathBuf> {
    let api = hf_hub::api::sync::Api::new()?;
    let repo = api.model(MODEL_ID.to_string());

    let mut snapshot_dir = None;
    for file in SNAPSHOT_FILES {
        info!("fetching {MODEL_ID}/{file}");
        let path = repo
            .get(file)
            .with_context(|| format!("failed to download {file} for {MODEL_ID}"))?;
        snapshot_dir = path.parent().map(Path::to_path_buf);
    }

    snapshot_dir.ok_or_else(|| anyhow!("hf-hub snapshot for {MODEL_ID} has no parent directory"))
}
