mod api;
mod config;
mod error;
mod orchestrator;
mod scene;
mod timeline;
mod video;

use anyhow::Context;
use api::{StabilityClient, StatusClient};
use clap::Parser;
use config::{
    resolve_api_key, AnimationConfig, Resolution, StabilityConfig, DEFAULT_FPS, DEFAULT_FRAME_SIZE,
};
use orchestrator::AnimationOrchestrator;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use video::FfmpegRenderer;

#[derive(Parser, Debug)]
#[command(name = "script-animator")]
#[command(about = "Turn a SCENE/CHARACTER script into an animated video", long_about = None)]
struct Args {
    /// Inline script text
    #[arg(short, long)]
    script: Option<String>,

    /// Script file path
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output video file name, written inside the output directory
    #[arg(short, long, default_value = "animation.mp4")]
    output: String,

    /// Directory for generated images and the final video
    #[arg(short = 'd', long, default_value = "generated_animations")]
    output_dir: PathBuf,

    /// Frame width in pixels
    #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
    height: u32,

    /// Frames per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Stability AI API key
    #[arg(long)]
    api_key: Option<String>,

    /// Font file for narration overlays (ffmpeg default font when omitted)
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Do not query the Stability status page before generating
    #[arg(long)]
    skip_status_check: bool,

    /// Give up on a single scene image after this many seconds
    #[arg(long)]
    image_timeout_secs: Option<u64>,

    /// Print the parsed scenes as JSON and exit
    #[arg(long)]
    dump_scenes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    let script = if let Some(text) = args.script.clone() {
        text
    } else if let Some(file_path) = &args.file {
        tokio::fs::read_to_string(file_path)
            .await
            .with_context(|| format!("Failed to read script file: {}", file_path.display()))?
    } else {
        anyhow::bail!("Either --script or --file must be provided");
    };

    if args.dump_scenes {
        let scenes = scene::parse_script(&script);
        println!("{}", serde_json::to_string_pretty(&scenes)?);
        return Ok(());
    }

    info!("Starting animation generation...");
    info!("Script length: {} characters", script.len());

    match run_generation(&args, &script).await {
        Ok(path) => {
            info!("Animation generated successfully: {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Animation generation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run_generation(args: &Args, script: &str) -> anyhow::Result<PathBuf> {
    let api_key = resolve_api_key(args.api_key.clone())?;

    let config = AnimationConfig {
        output_dir: args.output_dir.clone(),
        check_service: !args.skip_status_check,
        image_timeout: args.image_timeout_secs.map(Duration::from_secs),
    };
    let stability = StabilityConfig::new(api_key, config.output_dir.clone());

    let images = StabilityClient::new(stability.clone()).context("Failed to create HTTP client")?;
    let health = StatusClient::new(stability.status_url.clone())
        .context("Failed to create status client")?;
    let renderer =
        FfmpegRenderer::new(config.output_dir.join("work")).with_font_file(args.font_file.clone());

    let resolution = Resolution::new(args.width, args.height);
    let orchestrator = AnimationOrchestrator::new(config, images, health, renderer);
    let path = orchestrator
        .create_animation(script, &args.output, resolution, args.fps)
        .await?;

    Ok(path)
}
