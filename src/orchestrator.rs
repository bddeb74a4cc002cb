use crate::api::{ImageGenerator, ServiceHealth};
use crate::config::{AnimationConfig, Resolution};
use crate::error::{Result, VideoError};
use crate::scene::{parse_script, Scene};
use crate::timeline::{plan, ClipPlan, Timeline};
use crate::video::Renderer;
use std::path::PathBuf;
use tracing::{info, warn};

/// Drives a script through image generation, clip planning and rendering.
pub struct AnimationOrchestrator<I, H, R> {
    config: AnimationConfig,
    images: I,
    health: H,
    renderer: R,
}

impl<I, H, R> AnimationOrchestrator<I, H, R>
where
    I: ImageGenerator,
    H: ServiceHealth,
    R: Renderer,
{
    pub fn new(config: AnimationConfig, images: I, health: H, renderer: R) -> Self {
        Self {
            config,
            images,
            health,
            renderer,
        }
    }

    /// Render `script` to `<output_dir>/<output_name>` and return that path.
    ///
    /// A scene whose image cannot be generated is skipped. The run only fails
    /// when the service is down, no scene survives, or rendering fails.
    pub async fn create_animation(
        &self,
        script: &str,
        output_name: &str,
        resolution: Resolution,
        fps: u32,
    ) -> Result<PathBuf> {
        let scenes = parse_script(script);
        info!("Script contains {} scene(s)", scenes.len());
        if scenes.is_empty() {
            return Err(VideoError::NoScenesProduced);
        }

        if self.config.check_service && !self.health.service_available().await {
            return Err(VideoError::ServiceUnavailable);
        }

        let timeline = self.build_timeline(&scenes, resolution).await?;
        info!(
            "Timeline ready: {}/{} scene(s), {:.1}s",
            timeline.len(),
            scenes.len(),
            timeline.total_duration()
        );

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| {
                VideoError::RenderFailed(format!(
                    "Cannot create output directory {}: {}",
                    self.config.output_dir.display(),
                    e
                ))
            })?;
        let output_path = self.config.output_dir.join(output_name);

        self.renderer
            .render(&timeline, fps, &output_path)
            .await
            .map_err(|e| match e {
                VideoError::RenderFailed(_) => e,
                other => VideoError::RenderFailed(other.to_string()),
            })
    }

    /// Plan every scene in order, dropping the ones whose image failed.
    pub async fn build_timeline(&self, scenes: &[Scene], resolution: Resolution) -> Result<Timeline> {
        let mut outcomes = Vec::with_capacity(scenes.len());
        for (index, scene) in scenes.iter().enumerate() {
            outcomes.push(self.plan_scene(index, scene, resolution).await);
        }

        let clips: Vec<ClipPlan> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(clip) => Some(clip),
                Err(e) => {
                    warn!("Error processing scene: {}", e);
                    None
                }
            })
            .collect();

        if clips.is_empty() {
            return Err(VideoError::NoScenesProduced);
        }
        Ok(Timeline::new(clips))
    }

    async fn plan_scene(&self, index: usize, scene: &Scene, resolution: Resolution) -> Result<ClipPlan> {
        info!("Generating image for scene {}: {}", index, scene.description);

        let request = self.images.generate_image(&scene.description, resolution);
        let generated = match self.config.image_timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(_) => Err(format!("timed out after {:.1}s", limit.as_secs_f64())),
            },
            None => request.await.map_err(|e| e.to_string()),
        };

        let image = generated.map_err(|reason| VideoError::ImageGenerationFailed {
            scene_index: index,
            reason,
        })?;

        Ok(plan(scene, image, resolution))
    }
}
