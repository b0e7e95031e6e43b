pub mod error;
pub mod normalizer;
pub mod scorer;
pub mod traits;
pub mod types;

pub use error::*;
pub use normalizer::normalize;
pub use scorer::{score, ScoreOutcome, INCLUSION_THRESHOLD};
pub use traits::*;
pub use types::*;
