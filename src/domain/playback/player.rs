use async_trait::async_trait;

/// State reported by the external media player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    /// Map the numeric state codes used by embedded video players
    /// (-1 unstarted, 0 ended, 1 playing, 2 paused, 3 buffering, 5 cued)
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(PlayerState::Unstarted),
            0 => Some(PlayerState::Ended),
            1 => Some(PlayerState::Playing),
            2 => Some(PlayerState::Paused),
            3 => Some(PlayerState::Buffering),
            5 => Some(PlayerState::Cued),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlayerError {
    #[error("player is not ready")]
    NotReady,
    #[error("player call failed: {0}")]
    Call(String),
}

/// Capability over an externally rendered media player.
///
/// Only the playback session calls these while it is attached.
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    async fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) -> Result<(), PlayerError>;

    async fn play(&self) -> Result<(), PlayerError>;

    async fn pause(&self) -> Result<(), PlayerError>;

    async fn current_time(&self) -> Result<f64, PlayerError>;

    async fn player_state(&self) -> Result<PlayerState, PlayerError>;
}
