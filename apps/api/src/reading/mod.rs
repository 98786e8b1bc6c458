// Reading Normalizer: upstream CGM payload -> canonical `Reading`.
// Owns every tolerance rule for garbled feed data. No retries, no caching.

pub mod feed;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod synthetic;
pub mod trend;

use thiserror::Error;

pub use feed::{GlucoseFeed, LiveFeed, RawFeedPayload};
pub use models::{GlucoseStatus, Reading, Trend};
pub use normalizer::{acquire_reading, normalize_payload};
pub use synthetic::SyntheticFeed;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeedError {
    /// The transport call failed or the feed answered with a non-success status.
    #[error("{0}")]
    Fetch(String),

    /// The feed answered, but the payload cannot be turned into a reading.
    #[error("{0}")]
    Data(String),
}
