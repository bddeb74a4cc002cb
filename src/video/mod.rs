mod generator;

pub use generator::FfmpegRenderer;

use crate::error::Result;
use crate::timeline::Timeline;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Encodes a timeline into a single video file.
///
/// Implementations must honor each clip's duration and overlay timing, and
/// release any intermediate files whether or not encoding succeeds.
pub trait Renderer {
    fn render(
        &self,
        timeline: &Timeline,
        fps: u32,
        output_path: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}
