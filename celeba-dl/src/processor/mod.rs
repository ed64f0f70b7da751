//! Image decoding and preprocessing building blocks.

pub mod decode;
pub mod transform;

pub use decode::*;
pub use transform::*;
