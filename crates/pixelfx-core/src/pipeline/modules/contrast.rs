use anyhow::Result;
use rand::RngCore;

use crate::image_buf::ImageBuf;
use crate::pipeline::module::{EffectModule, EffectParams};
use crate::registry::{EffectId, EffectSpec, ParamSpec};

pub const DEFAULT_FACTOR: f64 = 1.0;

pub struct Contrast;

impl EffectModule for Contrast {
    fn id(&self) -> EffectId {
        EffectId::Contrast
    }

    fn spec(&self) -> EffectSpec {
        EffectSpec {
            name: "Contrast",
            description: "Adjust image contrast",
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

    /// Scales each channel's distance from the image's own mean luminance:
    /// factor > 1 pushes values away from the mean, factor < 1 pulls them in,
    /// factor 0 collapses the image to flat mean gray.
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
        let factor = factor.max(0.0);

        let channels = input.format.channels();
        let color = input.format.color_channels();

        let mut sum = 0.0_f64;
        for pixel in input.data.chunks_exact(channels) {
            sum += input.luma(pixel) as f64;
        }
        let mean = sum / input.pixel_count().max(1) as f64;

        for pixel in input.data.chunks_exact_mut(channels) {
            for v in &mut pixel[..color] {
                *v = ((*v as f64 - mean) * factor + mean)
                    .clamp(0.0, 255.0)
                    .round() as u8;
            }
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_buf::PixelFormat;
    use rand::rngs::mock::StepRng;

    fn rng() -> StepRng {
        StepRng::new(0, 1)
    }

    /// Two-tone gray image: half 64, half 192, mean 128.
    fn two_tone() -> ImageBuf {
        let mut data = vec![64u8; 8];
        data.extend(vec![192u8; 8]);
        ImageBuf::from_data(4, 4, PixelFormat::Gray, data).unwrap()
    }

    #[test]
    fn factor_one_is_identity() {
        let input = two_tone();
        let expected = input.clone();
        let output = Contrast
            .apply(input, &EffectParams::default(), &mut rng())
            .unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn boost_spreads_values_from_mean() {
        let params = EffectParams::default().with("factor", 1.5);
        let output = Contrast.apply(two_tone(), &params, &mut rng()).unwrap();
        assert_eq!(output.data[0], 32); // (64-128)*1.5+128
        assert_eq!(output.data[15], 224); // (192-128)*1.5+128
    }

    #[test]
    fn reduce_pulls_values_toward_mean() {
        let params = EffectParams::default().with("factor", 0.5);
        let output = Contrast.apply(two_tone(), &params, &mut rng()).unwrap();
        assert_eq!(output.data[0], 96);
        assert_eq!(output.data[15], 160);
    }

    #[test]
    fn zero_factor_collapses_to_mean_gray() {
        let params = EffectParams::default().with("factor", 0.0);
        let output = Contrast.apply(two_tone(), &params, &mut rng()).unwrap();
        assert!(output.data.iter().all(|&v| v == 128));
    }

    #[test]
    fn solid_image_is_a_fixed_point() {
        let input = ImageBuf::filled(5, 5, PixelFormat::Rgb, 77);
        let params = EffectParams::default().with("factor", 1.8);
        let output = Contrast.apply(input, &params, &mut rng()).unwrap();
        assert!(output.data.iter().all(|&v| v == 77));
    }

    #[test]
    fn extreme_factor_clamps() {
        let params = EffectParams::default().with("factor", 100.0);
        let output = Contrast.apply(two_tone(), &params, &mut rng()).unwrap();
        assert_eq!(output.data[0], 0);
        assert_eq!(output.data[15], 255);
    }

    #[test]
    fn rgb_pivot_uses_luminance_not_per_channel_mean() {
        // A saturated red field: per-channel means differ wildly, the
        // luminance pivot keeps hue while spreading intensity.
        let input = ImageBuf::from_data(1, 2, PixelFormat::Rgb, vec![200, 40, 40, 100, 20, 20])
            .unwrap();
        let params = EffectParams::default().with("factor", 1.2);
        let output = Contrast.apply(input, &params, &mut rng()).unwrap();
        // Channels above the luminance mean move up, channels below move down.
        assert!(output.data[0] > 200);
        assert!(output.data[4] < 20);
    }

    #[test]
    fn alpha_channel_untouched() {
        let input = ImageBuf::from_data(1, 2, PixelFormat::Rgba, vec![
            40, 40, 40, 9, 220, 220, 220, 200,
        ])
        .unwrap();
        let params = EffectParams::default().with("factor", 1.5);
        let output = Contrast.apply(input, &params, &mut rng()).unwrap();
        assert_eq!(output.data[3], 9);
        assert_eq!(output.data[7], 200);
    }
}
