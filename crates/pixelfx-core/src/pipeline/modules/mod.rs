mod blur;
mod brightness;
mod contrast;
mod grayscale;
mod noise_removal;
mod salt_pepper;

pub use blur::Blur;
pub use brightness::Brightness;
pub use contrast::Contrast;
pub use grayscale::Grayscale;
pub use noise_removal::NoiseRemoval;
pub use salt_pepper::SaltPepper;
