pub mod module;
pub mod modules;

use std::collections::HashMap;

use anyhow::Result;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::image_buf::ImageBuf;
use crate::registry::{REGISTRY, Registry};
use module::EffectParams;

/// Longest edge of the working image in preview mode.
const PREVIEW_MAX_EDGE: u32 = 800;

/// One step of a pipeline request: an effect identifier plus its parameter
/// values. Parameters left out of the map take the effect's defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EffectRequest {
    pub id: String,
    #[serde(default)]
    pub params: HashMap<String, f64>,
}

impl EffectRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: HashMap::new(),
        }
    }

    pub fn param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_owned(), value);
        self
    }
}

/// Applies an ordered list of effects to one image.
///
/// ```text
/// decoded image -> [effect 1] -> [effect 2] -> ... -> result image
/// ```
///
/// Requests are applied strictly in caller order; identifiers that don't
/// resolve pass the image through unchanged. The pipeline holds no state
/// across invocations, so one instance can serve any number of calls.
pub struct Pipeline {
    registry: &'static Registry,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            registry: &REGISTRY,
        }
    }

    /// Run the pipeline with an unseeded random source.
    ///
    /// In preview mode the working image is first downscaled so its longest
    /// edge fits in 800px and the result is returned at that resolution.
    pub fn apply(
        &self,
        input: ImageBuf,
        requests: &[EffectRequest],
        preview: bool,
    ) -> Result<ImageBuf> {
        self.apply_with_rng(input, requests, preview, &mut rand::thread_rng())
    }

    /// Same as [`Pipeline::apply`] but with a caller-provided random source,
    /// which makes the noise effects reproducible under a seeded rng.
    pub fn apply_with_rng(
        &self,
        input: ImageBuf,
        requests: &[EffectRequest],
        preview: bool,
        rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        let mut current = if preview {
            input.resize_to_fit(PREVIEW_MAX_EDGE)?
        } else {
            input
        };

        for request in requests {
            let Some(module) = self.registry.resolve(&request.id) else {
                debug!(id = %request.id, "unknown effect, passing image through");
                continue;
            };
            debug!(effect = module.id().as_str(), "applying");
            let params = EffectParams::from(request.params.clone());
            current = module.apply(current, &params, rng)?;
        }
        Ok(current)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
