pub mod align;
pub mod runner;

pub use align::*;
pub use runner::*;
