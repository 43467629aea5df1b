use std::collections::HashMap;

use anyhow::Result;
use rand::RngCore;

use crate::image_buf::ImageBuf;
use crate::registry::{EffectId, EffectSpec};

/// A single named transform in the effect pipeline.
///
/// Transforms are stateless; any randomness comes through the caller's
/// `rng` so tests can seed it. Implementations own the clamping and
/// defaulting of their parameters and must stay total on bad input.
pub trait EffectModule: Send + Sync {
    fn id(&self) -> EffectId;
    fn spec(&self) -> EffectSpec;
    fn apply(&self, input: ImageBuf, params: &EffectParams, rng: &mut dyn RngCore)
    -> Result<ImageBuf>;
}

/// Caller-supplied parameter values for one effect invocation. Missing
/// entries fall back to the per-transform default at the lookup site.
#[derive(Clone, Debug, Default)]
pub struct EffectParams {
    values: HashMap<String, f64>,
}

impl EffectParams {
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.values.get(name).copied().unwrap_or(default)
    }

    /// Builder-style insert, mostly for tests.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_owned(), value);
        self
    }
}

impl From<HashMap<String, f64>> for EffectParams {
    fn from(values: HashMap<String, f64>) -> Self {
        Self { values }
    }
}
