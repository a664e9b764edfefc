use anyhow::Result;
use polish_embed::transcript::{write_outputs, TranscriptClient, TranscriptEntry};

const VIDEO_ID: &str = "OmIK2RgXt_U";

// Preferred caption language first, fallback second.
const LANGUAGES: &[&str] = &["pl", "en"];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    println!("🎥 Downloading transcript for video: {VIDEO_ID}");

    // Failures are reported and swallowed; the fetcher always exits 0.
    if let Err(err) = run(VIDEO_ID).await {
        println!("❌ Error downloading transcript: {err:#}");
    }
}

async fn run(video_id: &str) -> Result<()> {
    let client = TranscriptClient::from_env();
    let entries = client.fetch(video_id, LANGUAGES).await?;

    let (json_path, clean_path) = write_outputs(video_id, &entries)?;

    println!("✅ Transcript downloaded successfully!");
    println!("📄 JSON file: {}", json_path.display());
    println!("🧹 Clean text file: {}", clean_path.display());

    print_preview(&entries);

    Ok(())
}

fn print_preview(entries: &[TranscriptEntry]) {
    println!("\n📋 First 10 lines of transcript:");
    for entry in entries.iter().take(10) {
        println!("{:.1}s: {}", entry.start, entry.text);
    }
}
