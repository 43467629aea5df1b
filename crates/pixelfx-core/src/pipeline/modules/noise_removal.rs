use anyhow::Result;
use rand::RngCore;

use crate::image_buf::ImageBuf;
use crate::pipeline::module::{EffectModule, EffectParams};
use crate::registry::{EffectId, EffectSpec, ParamSpec};

pub const DEFAULT_STRENGTH: f64 = 3.0;

/// Kernel side length for a given strength: 2s+1, bounded to [3, 9].
/// Strength is clamped in f64 before any integer math, so huge or
/// non-finite values cannot overflow; the floor-then-double keeps the
/// side odd for fractional strengths.
fn kernel_side(strength: f64) -> i64 {
    let strength = if strength.is_nan() {
        DEFAULT_STRENGTH
    } else {
        strength.clamp(1.0, 4.0)
    };
    2 * strength as i64 + 1
}

pub struct NoiseRemoval;

impl EffectModule for NoiseRemoval {
    fn id(&self) -> EffectId {
        EffectId::NoiseRemoval
    }

    fn spec(&self) -> EffectSpec {
        EffectSpec {
            name: "Noise Removal",
            description: "Remove impulsive noise with a median filter",
            params: vec![ParamSpec {
                id: "strength",
                name: "Strength",
                min: 1.0,
                max: 4.0,
                step: 1.0,
                default: DEFAULT_STRENGTH,
            }],
        }
    }

    /// Replaces each pixel with the per-channel median of its square
    /// neighborhood. Border neighborhoods clamp coordinates to the edge,
    /// which repeats edge pixels rather than shrinking the window.
    fn apply(
        &self,
        input: ImageBuf,
        params: &EffectParams,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        let strength = params.get_or("strength", DEFAULT_STRENGTH);
        let side = kernel_side(strength);
        let radius = side / 2;

        let width = input.width as i64;
        let height = input.height as i64;
        let channels = input.format.channels();

        let mut out = Vec::with_capacity(input.data.len());
        let mut window = Vec::with_capacity((side * side) as usize);

        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    window.clear();
                    for dy in -radius..=radius {
                        let sy = (y + dy).clamp(0, height - 1);
                        for dx in -radius..=radius {
                            let sx = (x + dx).clamp(0, width - 1);
                            window.push(input.data[(sy * width + sx) as usize * channels + c]);
                        }
                    }
                    let mid = window.len() / 2;
                    let (_, median, _) = window.select_nth_unstable(mid);
                    out.push(*median);
                }
            }
        }

        ImageBuf::from_data(input.width, input.height, input.format, out)
    }
}
