use anyhow::Result;
use rand::RngCore;

use crate::image_buf::ImageBuf;
use crate::pipeline::module::{EffectModule, EffectParams};
use crate::registry::{EffectId, EffectSpec, ParamSpec};

pub const DEFAULT_RADIUS: f64 = 5.0;

pub struct Blur;

impl EffectModule for Blur {
    fn id(&self) -> EffectId {
        EffectId::Blur
    }

    fn spec(&self) -> EffectSpec {
        EffectSpec {
            name: "Blur",
            description: "Apply blur effect",
            params: vec![ParamSpec {
                id: "radius",
                name: "Radius",
                min: 0.0,
                max: 20.0,
                step: 0.5,
                default: DEFAULT_RADIUS,
            }],
        }
    }

    fn apply(
        &self,
        input: ImageBuf,
        params: &EffectParams,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        let radius = params.get_or("radius", DEFAULT_RADIUS);
        // Zero-radius Gaussian still resamples and costs a full pass;
        // skip it so radius 0 stays bit-identical to the input.
        if radius <= 0.0 {
            return Ok(input);
        }
        let blurred = input.to_dynamic()?.blur(radius as f32);
        Ok(ImageBuf::from_dynamic(blurred))
    }
}
