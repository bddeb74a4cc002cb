use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Service unavailable: image generation API is reporting an outage")]
    ServiceUnavailable,

    #[error("Image generation failed for scene {scene_index}: {reason}")]
    ImageGenerationFailed { scene_index: usize, reason: String },

    #[error("No scenes were successfully generated")]
    NoScenesProduced,

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error("FFmpeg error: {0}")]
    FfmpegError(String),
}

pub type Result<T> = std::result::Result<T, VideoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(VideoError::ServiceUnavailable
            .to_string()
            .starts_with("Service unavailable"));
        assert_eq!(
            VideoError::ImageGenerationFailed {
                scene_index: 2,
                reason: "timeout".to_string(),
            }
            .to_string(),
            "Image generation failed for scene 2: timeout"
        );
        assert_eq!(
            VideoError::NoScenesProduced.to_string(),
            "No scenes were successfully generated"
        );
        assert!(VideoError::RenderFailed("x".into())
            .to_string()
            .starts_with("Render failed:"));
        assert!(VideoError::FfmpegError("x".into())
            .to_string()
            .starts_with("FFmpeg error:"));
    }

    #[test]
    fn io_errors_convert_and_keep_message() {
        let err: VideoError = std::io::Error::other("disk full").into();
        assert!(matches!(err, VideoError::IoError(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
