pub mod active;
pub mod engine;
pub mod error;
pub mod player;
pub mod repeat;
pub mod sync;

pub use active::{find_active_sentence, range_active_sentence};
pub use engine::{PlaybackSession, TickOutcome, DEFAULT_POLL_INTERVAL};
pub use error::PlaybackError;
pub use player::{MediaPlayer, PlayerError, PlayerState};
pub use repeat::RepeatState;
pub use sync::{SyncState, TickDecision};
