pub mod cache;
pub mod data_feed;
pub mod evaluator;
pub mod predictor;

pub use cache::*;
pub use data_feed::*;
pub use evaluator::*;
pub use predictor::*;
