//! Clip planning: turns a parsed scene plus its generated image into a
//! renderable clip with timed narration overlays.

use crate::config::Resolution;
use crate::scene::Scene;
use std::path::PathBuf;

/// Seconds each narration line stays on screen.
pub const ACTION_SECONDS: f64 = 3.0;
/// Shortest clip, used for scenes with one action or none.
pub const MIN_CLIP_SECONDS: f64 = 5.0;

/// Horizontal space left free on either side of the overlay box, in total.
const OVERLAY_SIDE_PADDING: u32 = 100;

/// Handle to an image produced by the image generator.
pub type ImageRef = PathBuf;

/// A piece of narration drawn over the scene image.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEvent {
    pub text: String,
    /// Offset from the start of the clip, in seconds
    pub start: f64,
    pub duration: f64,
}

impl OverlayEvent {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Appearance of the narration overlays: bottom-centered white text on a
/// translucent black box.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub font_size: u32,
    pub font_color: String,
    pub box_color: String,
    /// Maximum width of a text line in pixels
    pub box_width: u32,
}

impl OverlayStyle {
    pub fn for_resolution(resolution: Resolution) -> Self {
        Self {
            font_size: 30,
            font_color: "white".to_string(),
            box_color: "black@0.5".to_string(),
            box_width: resolution.width.saturating_sub(OVERLAY_SIDE_PADDING),
        }
    }

    /// Rough character budget per line, assuming glyphs are half as wide as tall.
    pub fn max_chars_per_line(&self) -> usize {
        let glyph_width = (self.font_size / 2).max(1);
        ((self.box_width / glyph_width) as usize).max(1)
    }

    /// Greedy word wrap to fit `box_width`. Words longer than a line are kept whole.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let limit = self.max_chars_per_line();
        let mut lines = Vec::new();
        let mut line = String::new();

        for word in text.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > limit && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }

        lines
    }
}

/// Everything the renderer needs to produce one scene's clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlan {
    pub image: ImageRef,
    /// Output frame size the overlays were laid out for
    pub frame: Resolution,
    /// Clip length in seconds
    pub duration: f64,
    pub overlays: Vec<OverlayEvent>,
    pub style: OverlayStyle,
}

/// Clips in playback order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub clips: Vec<ClipPlan>,
}

impl Timeline {
    pub fn new(clips: Vec<ClipPlan>) -> Self {
        Self { clips }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|clip| clip.duration).sum()
    }
}

pub fn clip_duration(action_count: usize) -> f64 {
    (ACTION_SECONDS * action_count as f64).max(MIN_CLIP_SECONDS)
}

/// Lay out `scene` over `image`: one overlay per action, back to back.
pub fn plan(scene: &Scene, image: ImageRef, resolution: Resolution) -> ClipPlan {
    let overlays = scene
        .actions
        .iter()
        .enumerate()
        .map(|(i, action)| OverlayEvent {
            text: action.clone(),
            start: i as f64 * ACTION_SECONDS,
            duration: ACTION_SECONDS,
        })
        .collect();

    ClipPlan {
        image,
        frame: resolution,
        duration: clip_duration(scene.actions.len()),
        overlays,
        style: OverlayStyle::for_resolution(resolution),
    }
}
