pub mod agents;
pub mod dp;
pub mod env;
pub mod error;
pub mod rng;
pub mod space;

pub use error::Error;
