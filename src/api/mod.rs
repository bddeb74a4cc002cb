mod stability;
mod status;

pub use stability::StabilityClient;
pub use status::StatusClient;

use crate::config::Resolution;
use crate::error::Result;
use crate::timeline::ImageRef;
use std::future::Future;

/// Produces one still image per prompt.
pub trait ImageGenerator {
    fn generate_image(
        &self,
        prompt: &str,
        resolution: Resolution,
    ) -> impl Future<Output = Result<ImageRef>> + Send;
}

/// Reports whether the image service is worth calling right now.
pub trait ServiceHealth {
    fn service_available(&self) -> impl Future<Output = bool> + Send;
}
