use anyhow::Result;
use rand::RngCore;

use crate::image_buf::ImageBuf;
use crate::pipeline::module::{EffectModule, EffectParams};
use crate::registry::{EffectId, EffectSpec, ParamSpec};

pub const DEFAULT_FACTOR: f64 = 1.0;

pub struct Brightness;

impl EffectModule for Brightness {
    fn id(&self) -> EffectId {
        EffectId::Brightness
    }

    fn spec(&self) -> EffectSpec {
        EffectSpec {
            name: "Brightness",
            description: "Adjust image brightness",
            params: vec![ParamSpec {
                id: "factor",
                name: "Factor",
                min: 0.0,
                max: 2.0,
                step: 0.1,
                default: DEFAULT_FACTOR,
            }],
        }
    }

    fn apply(
        &self,
        mut input: ImageBuf,
        params: &EffectParams,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        let factor = params.get_or("factor", DEFAULT_FACTOR);
        if factor == 1.0 {
            return Ok(input);
        }
        // Negative gain has no meaning for a multiplicative adjustment;
        // floor at 0 (solid black) instead of wrapping.
        let factor = factor.max(0.0);

        let channels = input.format.channels();
        let color = input.format.color_channels();
        for pixel in input.data.chunks_exact_mut(channels) {
            for v in &mut pixel[..color] {
                *v = (*v as f64 * factor).clamp(0.0, 255.0).round() as u8;
            }
        }
        Ok(input)
    }
}
