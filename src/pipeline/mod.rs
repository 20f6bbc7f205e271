mod artifacts;
mod encode;
mod fftool;
mod probe;

pub use artifacts::prepare;
pub use encode::{convert, Bitrate};
