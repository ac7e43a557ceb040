pub mod normalizer;
pub mod windows;

pub use normalizer::*;
pub use windows::*;
