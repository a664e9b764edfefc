use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const DEFAULT_PROVIDER_URL: &str = "http://127.0.0.1:8000";

/// One caption line as returned by the transcript provider. `start` and
/// `duration` are seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Thin client for a transcript-API service. The YouTube caption protocol
/// itself lives behind the provider; this client only speaks its JSON
/// contract: `GET {base}/transcripts/{video_id}?lang={code}`.
pub struct TranscriptClient {
    http: reqwest::Client,
    base_url: String,
}

impl TranscriptClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("TRANSCRIPT_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string());
        Self::new(base_url)
    }

    /// Fetch the caption track, trying languages in preference order. The
    /// first language that succeeds wins; if they all fail the last error is
    /// returned.
    pub async fn fetch(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<Vec<TranscriptEntry>> {
        let mut last_err = anyhow!("no transcript languages requested");
        for lang in languages {
            match self.fetch_language(video_id, lang).await {
                Ok(entries) => return Ok(entries),
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }

    async fn fetch_language(&self, video_id: &str, lang: &str) -> Result<Vec<TranscriptEntry>> {
        let url = format!(
            "{}/transcripts/{video_id}?lang={lang}",
            self.base_url.trim_end_matches('/')
        );

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("transcript provider unreachable at {url}"))?;

        if !res.status().is_success() {
            return Err(anyhow!(
                "no '{lang}' transcript for video {video_id} (provider returned {})",
                res.status()
            ));
        }

        let entries = res
            .json::<Vec<TranscriptEntry>>()
            .await
            .context("transcript provider returned malformed entries")?;

        Ok(entries)
    }
}

/// Write both output artifacts into the working directory:
/// `transcript_<id>.json` (pretty, UTF-8, entry order preserved) and
/// `transcript_<id>_clean.txt` (trimmed texts joined by single spaces).
pub fn write_outputs(
    video_id: &str,
    entries: &[TranscriptEntry],
) -> Result<(PathBuf, PathBuf)> {
    write_outputs_in(Path::new("."), video_id, entries)
}

pub fn write_outputs_in(
    dir: &Path,
    video_id: &str,
    entries: &[TranscriptEntry],
) -> Result<(PathBuf, PathBuf)> {
    let json_path = dir.join(format!("transcript_{video_id}.json"));
    let clean_path = dir.join(format!("transcript_{video_id}_clean.txt"));

    write_json(&json_path, entries)?;
    fs::write(&clean_path, clean_text(entries))
        .with_context(|| format!("failed to write {}", clean_path.display()))?;

    Ok((json_path, clean_path))
}

fn write_json(path: &Path, entries: &[TranscriptEntry]) -> Result<()> {
    // serde_json pretty-prints with 2-space indent and leaves non-ASCII
    // characters unescaped.
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Trimmed entry texts joined by single spaces; whitespace-only entries are
/// dropped.
pub fn clean_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path as AxumPath, Query},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde::Deserialize;
    use tokio::net::TcpListener;

    fn entry(text: &str, start: f64, duration: f64) -> TranscriptEntry {
        TranscriptEntry {
            text: text.into(),
            start,
            duration,
        }
    }

    #[test]
    fn clean_text_skips_blank_entries_and_joins_with_single_spaces() {
        let entries = vec![
            entry("Dzień dobry", 0.0, 1.2),
            entry("   ", 1.2, 0.8),
            entry("  wszystkim ", 2.0, 1.5),
            entry("", 3.5, 0.5),
            entry("widzom", 4.0, 1.0),
        ];
        assert_eq!(clean_text(&entries), "Dzień dobry wszystkim widzom");
    }

    #[test]
    fn clean_text_of_all_blank_entries_is_empty() {
        let entries = vec![entry("", 0.0, 1.0), entry("  \t", 1.0, 1.0)];
        assert_eq!(clean_text(&entries), "");
    }

    #[test]
    fn json_output_preserves_order_and_non_ascii() {
        let entries = vec![
            entry("zażółć gęślą jaźń", 0.0, 2.5),
            entry("drugi wiersz", 2.5, 1.5),
        ];
        let json = serde_json::to_string_pretty(&entries).unwrap();

        // Literal UTF-8, no \u escapes, 2-space indent.
        assert!(json.contains("zażółć gęślą jaźń"));
        assert!(!json.contains("\\u"));
        assert!(json.contains("\n  {"));

        let roundtrip: Vec<TranscriptEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip[0].text, "zażółć gęślą jaźń");
        assert_eq!(roundtrip[1].text, "drugi wiersz");
    }

    #[derive(Deserialize)]
    struct LangQuery {
        lang: String,
    }

    /// Fake provider that only has an English track for one known video.
    async fn spawn_fake_provider() -> String {
        async fn transcript(
            AxumPath(video_id): AxumPath<String>,
            Query(query): Query<LangQuery>,
        ) -> Result<Json<Vec<TranscriptEntry>>, StatusCode> {
            if video_id != "known-video" || query.lang != "en" {
                return Err(StatusCode::NOT_FOUND);
            }
            Ok(Json(vec![
                TranscriptEntry {
                    text: "first line".into(),
                    start: 0.0,
                    duration: 1.5,
                },
                TranscriptEntry {
                    text: "second line".into(),
                    start: 1.5,
                    duration: 2.0,
                },
            ]))
        }

        let app = Router::new().route("/transcripts/{video_id}", get(transcript));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetch_falls_back_to_second_language() {
        let base = spawn_fake_provider().await;
        let client = TranscriptClient::new(base);

        let entries = client.fetch("known-video", &["pl", "en"]).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "first line");
        assert_eq!(entries[1].text, "second line");
        assert!(entries[0].start < entries[1].start);
    }

    #[tokio::test]
    async fn fetch_of_unknown_video_fails_in_every_language() {
        let base = spawn_fake_provider().await;
        let client = TranscriptClient::new(base);

        let err = client.fetch("no-such-video", &["pl", "en"]).await.unwrap_err();
        assert!(err.to_string().contains("no-such-video"));
    }

    #[test]
    fn write_outputs_produces_both_files() {
        let dir = std::env::temp_dir().join(format!("transcript-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let entries = vec![entry("jeden", 0.0, 1.0), entry("dwa", 1.0, 1.0)];
        let (json_path, clean_path) = write_outputs_in(&dir, "abc123", &entries).unwrap();

        assert!(json_path.ends_with("transcript_abc123.json"));
        assert!(clean_path.ends_with("transcript_abc123_clean.txt"));
        assert_eq!(fs::read_to_string(&clean_path).unwrap(), "jeden dwa");
        let parsed: Vec<TranscriptEntry> =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);

        fs::remove_dir_all(dir).ok();
    }
}
