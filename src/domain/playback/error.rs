use super::player::PlayerError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Sentence index {index} is out of range for a timeline of {len} sentences")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Player(#[from] PlayerError),
}
