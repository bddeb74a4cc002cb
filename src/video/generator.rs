use super::Renderer;
use crate::config::Resolution;
use crate::error::{Result, VideoError};
use crate::timeline::{ClipPlan, Timeline};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Renders clips with the `ffmpeg` binary found on PATH.
#[derive(Debug, Clone)]
pub struct FfmpegRenderer {
    work_dir: PathBuf,
    font_file: Option<PathBuf>,
}

impl FfmpegRenderer {
    pub fn new(work_dir: PathBuf) -> Self {
        Self {
            work_dir,
            font_file: None,
        }
    }

    pub fn with_font_file(mut self, font_file: Option<PathBuf>) -> Self {
        self.font_file = font_file;
        self
    }

    fn concat_file(&self) -> PathBuf {
        self.work_dir.join("concat.txt")
    }

    async fn render_segments(
        &self,
        timeline: &Timeline,
        fps: u32,
        output_path: &Path,
        segments: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let mut concat_content = String::new();

        for (index, clip) in timeline.clips.iter().enumerate() {
            let segment_path = self.work_dir.join(format!("segment_{}.mp4", index));
            segments.push(segment_path.clone());

            self.create_video_segment(clip, fps, &segment_path).await?;

            let abs_segment_path = tokio::fs::canonicalize(&segment_path).await.map_err(|e| {
                VideoError::FfmpegError(format!("Failed to get absolute path: {}", e))
            })?;
            concat_content.push_str(&concat_entry(&abs_segment_path));
        }

        tokio::fs::write(self.concat_file(), concat_content).await?;
        self.concat_videos(&self.concat_file(), output_path).await
    }

    async fn create_video_segment(&self, clip: &ClipPlan, fps: u32, output_path: &Path) -> Result<()> {
        info!(
            "Creating {:.1}s segment with {} overlay(s) from {}",
            clip.duration,
            clip.overlays.len(),
            clip.image.display()
        );

        let filter = segment_filter(clip, self.font_file.as_deref());
        debug!("Segment filter: {}", filter);

        let output = Command::new("ffmpeg")
            .arg("-y")
            .args(["-loop", "1"])
            .arg("-i")
            .arg(&clip.image)
            .args(["-vf", &filter])
            .args(["-t", &clip.duration.to_string()])
            .args(["-r", &fps.to_string()])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg(output_path)
            .output()
            .await
            .map_err(|e| VideoError::FfmpegError(format!("Failed to run FFmpeg: {}", e)))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(VideoError::FfmpegError(format!(
                "FFmpeg segment creation failed: {}",
                error
            )));
        }

        info!("Created segment: {}", output_path.display());
        Ok(())
    }

    async fn concat_videos(&self, concat_file: &Path, output_path: &Path) -> Result<()> {
        info!("Concatenating video segments...");

        let output = Command::new("ffmpeg")
            .args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .arg(concat_file)
            .args(["-c", "copy"])
            .arg(output_path)
            .output()
            .await
            .map_err(|e| VideoError::FfmpegError(format!("Failed to run FFmpeg: {}", e)))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(VideoError::FfmpegError(format!(
                "FFmpeg concat failed: {}",
                error
            )));
        }

        info!("Concatenated video: {}", output_path.display());
        Ok(())
    }

    async fn cleanup(&self, segments: &[PathBuf]) {
        tokio::fs::remove_file(self.concat_file()).await.ok();
        for segment in segments {
            tokio::fs::remove_file(segment).await.ok();
        }
    }
}

impl Renderer for FfmpegRenderer {
    async fn render(&self, timeline: &Timeline, fps: u32, output_path: &Path) -> Result<PathBuf> {
        if timeline.is_empty() {
            return Err(VideoError::FfmpegError("Nothing to render".to_string()));
        }
        info!(
            "Rendering {} clip(s), {:.1}s total at {} fps",
            timeline.len(),
            timeline.total_duration(),
            fps
        );

        tokio::fs::create_dir_all(&self.work_dir).await?;

        let mut segments = Vec::with_capacity(timeline.len());
        let result = self
            .render_segments(timeline, fps, output_path, &mut segments)
            .await;
        self.cleanup(&segments).await;
        result?;

        info!("Video generation completed: {}", output_path.display());
        Ok(output_path.to_path_buf())
    }
}

fn concat_entry(path: &Path) -> String {
    format!("file '{}'\n", path.display().to_string().replace('\'', "'\\''"))
}

/// Fit the image into the clip's frame, then stack one timed drawtext per overlay.
fn segment_filter(clip: &ClipPlan, font_file: Option<&Path>) -> String {
    let Resolution { width, height } = clip.frame;
    let mut filters = vec![format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1",
        w = width,
        h = height
    )];

    let font = font_file
        .map(|path| format!("fontfile={}:", escape_option_value(&path.display().to_string())))
        .unwrap_or_default();

    for overlay in &clip.overlays {
        let text = clip.style.wrap(&overlay.text).join("\n");
        filters.push(format!(
            "drawtext={font}text={text}:fontsize={size}:fontcolor={color}:box=1:boxcolor={boxc}:boxborderw=10:x=(w-text_w)/2:y=h-text_h-40:enable='between(t,{start},{end})'",
            font = font,
            text = escape_drawtext_text(&text),
            size = clip.style.font_size,
            color = clip.style.font_color,
            boxc = clip.style.box_color,
            start = overlay.start,
            end = overlay.end(),
        ));
    }

    filters.join(",")
}

/// Syntax characters of the filtergraph parser.
const GRAPH_SPECIALS: &[char] = &['\\', '\'', '[', ']', ',', ';'];
/// Syntax characters of the per-filter option parser.
const OPTION_SPECIALS: &[char] = &['\\', '\'', ':'];
/// Syntax characters of drawtext's text expansion.
const EXPANSION_SPECIALS: &[char] = &['\\', '%'];

fn backslash_escape(text: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if specials.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// ffmpeg unescapes a filter option twice (graph, then option parser).
fn escape_option_value(value: &str) -> String {
    backslash_escape(&backslash_escape(value, OPTION_SPECIALS), GRAPH_SPECIALS)
}

/// Narration also goes through drawtext's own `%{...}` expansion.
fn escape_drawtext_text(text: &str) -> String {
    escape_option_value(&backslash_escape(text, EXPANSION_SPECIALS))
}
