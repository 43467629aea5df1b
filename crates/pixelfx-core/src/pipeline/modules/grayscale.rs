use anyhow::Result;
use rand::RngCore;

use crate::image_buf::{ImageBuf, PixelFormat};
use crate::pipeline::module::{EffectModule, EffectParams};
use crate::registry::{EffectId, EffectSpec, ParamSpec};

pub const DEFAULT_FACTOR: f64 = 1.0;

pub struct Grayscale;

impl EffectModule for Grayscale {
    fn id(&self) -> EffectId {
        EffectId::Grayscale
    }

    fn spec(&self) -> EffectSpec {
        EffectSpec {
            name: "Grayscale",
            description: "Convert image to grayscale",
            params: vec![ParamSpec {
                id: "factor",
                name: "Factor",
                min: 0.0,
                max: 1.0,
                step: 0.1,
                default: DEFAULT_FACTOR,
            }],
        }
    }

    /// Cross-blend between the original pixel and its Rec. 601 gray value.
    /// factor 0 leaves the input untouched, factor 1 is full desaturation,
    /// anything between is a linear blend per color channel.
    fn apply(
        &self,
        mut input: ImageBuf,
        params: &EffectParams,
        _rng: &mut dyn RngCore,
    ) -> Result<ImageBuf> {
        let factor = params.get_or("factor", DEFAULT_FACTOR);
        if factor <= 0.0 || input.format == PixelFormat::Gray {
            return Ok(input);
        }
        let factor = factor.min(1.0);

        let channels = input.format.channels();
        let format = input.format;
        for pixel in input.data.chunks_exact_mut(channels) {
            let gray = match format {
                PixelFormat::Gray => pixel[0],
                PixelFormat::Rgb | PixelFormat::Rgba => {
                    let y = 0.299 * pixel[0] as f64
                        + 0.587 * pixel[1] as f64
                        + 0.114 * pixel[2] as f64;
                    y.round().clamp(0.0, 255.0) as u8
                }
            };
            for v in &mut pixel[..format.color_channels()] {
                let blended = *v as f64 + (gray as f64 - *v as f64) * factor;
                *v = blended.clamp(0.0, 255.0).round() as u8;
            }
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn rng() -> StepRng {
        StepRng::new(0, 1)
    }

    fn colored() -> ImageBuf {
        ImageBuf::from_data(2, 1, PixelFormat::Rgb, vec![200, 50, 10, 30, 180, 240]).unwrap()
    }

    #[test]
    fn zero_factor_is_identity() {
        let input = colored();
        let expected = input.clone();
        let params = EffectParams::default().with("factor", 0.0);
        let output = Grayscale.apply(input, &params, &mut rng()).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn full_factor_equalizes_channels_to_luma() {
        let input = colored();
        let params = EffectParams::default().with("factor", 1.0);
        let output = Grayscale.apply(input, &params, &mut rng()).unwrap();
        for (orig, out) in colored().data.chunks(3).zip(output.data.chunks(3)) {
            let y = (0.299 * orig[0] as f64 + 0.587 * orig[1] as f64 + 0.114 * orig[2] as f64)
                .round() as u8;
            assert_eq!(out, [y, y, y]);
        }
    }

    #[test]
    fn factor_above_one_clamps_to_full() {
        let full = Grayscale
            .apply(colored(), &EffectParams::default().with("factor", 1.0), &mut rng())
            .unwrap();
        let over = Grayscale
            .apply(colored(), &EffectParams::default().with("factor", 7.0), &mut rng())
            .unwrap();
        assert_eq!(full, over);
    }

    #[test]
    fn half_factor_blends_linearly() {
        let input = ImageBuf::from_data(1, 1, PixelFormat::Rgb, vec![200, 100, 0]).unwrap();
        let params = EffectParams::default().with("factor", 0.5);
        let output = Grayscale.apply(input, &params, &mut rng()).unwrap();
        // y = round(0.299*200 + 0.587*100) = 119
        assert_eq!(output.data, vec![160, 110, 60]); // midway to 119, rounded
    }

    #[test]
    fn luminance_weighted_not_channel_average() {
        let input = ImageBuf::from_data(1, 1, PixelFormat::Rgb, vec![0, 255, 0]).unwrap();
        let params = EffectParams::default().with("factor", 1.0);
        let output = Grayscale.apply(input, &params, &mut rng()).unwrap();
        // Green dominates perceived brightness: well above the 85 a plain
        // channel average would give.
        assert_eq!(output.data[0], 150);
    }

    #[test]
    fn gray_input_passes_through() {
        let input = ImageBuf::filled(3, 3, PixelFormat::Gray, 99);
        let expected = input.clone();
        let output = Grayscale
            .apply(input, &EffectParams::default(), &mut rng())
            .unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn alpha_channel_untouched() {
        let input = ImageBuf::from_data(1, 1, PixelFormat::Rgba, vec![250, 10, 10, 77]).unwrap();
        let params = EffectParams::default().with("factor", 1.0);
        let output = Grayscale.apply(input, &params, &mut rng()).unwrap();
        assert_eq!(output.data[3], 77);
        assert_eq!(output.data[0], output.data[1]);
        assert_eq!(output.data[1], output.data[2]);
    }
}
