pub mod evaluation;
pub mod features;
pub mod models;
pub mod training;

pub use evaluation::*;
pub use features::*;
pub use models::*;
pub use training::*;
