use crate::error::{Result, VideoError};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_ENV: &str = "STABILITY_API_KEY";

const DEFAULT_OUTPUT_DIR: &str = "generated_animations";
pub const DEFAULT_FPS: u32 = 24;
/// Frames are square unless the caller asks otherwise.
pub const DEFAULT_FRAME_SIZE: u32 = 1024;
const DEFAULT_BASE_URL: &str = "https://api.stability.ai";
const DEFAULT_STATUS_URL: &str = "https://stabilityai.instatus.com";
const DEFAULT_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_SIZE, DEFAULT_FRAME_SIZE)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Settings owned by the orchestrator. Frame size and rate are chosen per
/// call to `create_animation`.
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Directory the final video is written into
    pub output_dir: PathBuf,
    /// Ask the health collaborator before generating any image
    pub check_service: bool,
    /// Upper bound on a single image request; a timeout drops only that scene
    pub image_timeout: Option<Duration>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            check_service: true,
            image_timeout: None,
        }
    }
}

/// Connection settings for the Stability AI adapters.
#[derive(Debug, Clone)]
pub struct StabilityConfig {
    pub api_key: String,
    pub base_url: String,
    pub status_url: String,
    pub engine_id: String,
    /// Where generated scene images are stored
    pub image_dir: PathBuf,
    pub request_timeout: Duration,
}

impl StabilityConfig {
    pub fn new(api_key: String, image_dir: PathBuf) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            status_url: DEFAULT_STATUS_URL.to_string(),
            engine_id: DEFAULT_ENGINE.to_string(),
            image_dir,
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// Prefer an explicitly supplied key, then fall back to the environment.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String> {
    match explicit.filter(|key| !key.trim().is_empty()) {
        Some(key) => Ok(key),
        None => std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                VideoError::EnvError(format!(
                    "{} not found. Please set it via --api-key or the {} environment variable",
                    API_KEY_ENV, API_KEY_ENV
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = AnimationConfig::default();
        assert_eq!(Resolution::default(), Resolution::new(1024, 1024));
        assert_eq!(DEFAULT_FPS, 24);
        assert_eq!(config.output_dir, PathBuf::from("generated_animations"));
        assert!(config.check_service);
        assert!(config.image_timeout.is_none());
    }

    #[test]
    fn explicit_api_key_wins() {
        let key = resolve_api_key(Some("sk-explicit".to_string())).unwrap();
        assert_eq!(key, "sk-explicit");
    }

    #[test]
    fn resolution_displays_as_width_by_height() {
        assert_eq!(Resolution::new(1280, 720).to_string(), "1280x720");
    }
}
