pub mod elo;
pub mod types;

pub use elo::{compute_ratings, expected_score, DEFAULT_K_FACTOR};
pub use types::{SeriesOutcome, SideOutcome};
