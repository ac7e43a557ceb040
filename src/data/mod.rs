pub mod loader;
pub mod quotes;
pub mod writer;

pub use loader::*;
pub use quotes::*;
pub use writer::*;
