//! Core image effect engine: a fixed registry of parameterized transforms
//! and a pipeline that applies them to a raster buffer in caller order.
//!
//! The two public operations are [`list_effects`] for capability discovery
//! and [`Pipeline::apply`] for processing. Everything in between — decoding,
//! drivers, delivery — belongs to the caller.

pub mod codec;
pub mod image_buf;
pub mod pipeline;
pub mod registry;

pub use image_buf::{ImageBuf, PixelFormat};
pub use pipeline::{EffectRequest, Pipeline};
pub use registry::{EffectId, EffectSpec, ParamSpec, list_effects};
