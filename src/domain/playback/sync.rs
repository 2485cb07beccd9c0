use super::active::{find_active_sentence, range_active_sentence};
use super::repeat::RepeatState;
use crate::domain::lesson::TimedSentence;

/// Outcome of evaluating one play-head sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickDecision {
    pub active: Option<usize>,
    /// Where the play-head must be moved to keep it inside the loop window
    pub seek_to: Option<f64>,
}

/// Highlighting and looping state of one attached session
#[derive(Debug, Default, Clone)]
pub struct SyncState {
    repeat: RepeatState,
    pending_select: Option<usize>,
    active: Option<usize>,
}

impl SyncState {
    pub fn repeat(&self) -> RepeatState {
        self.repeat
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn pending_select(&self) -> Option<usize> {
        self.pending_select
    }

    /// Explicit selection leaves repeat mode and pins the highlight
    /// until the next evaluation
    pub fn select(&mut self, index: usize) {
        self.repeat = RepeatState::None;
        self.pending_select = Some(index);
        self.active = Some(index);
    }

    pub fn toggle_repeat(&mut self, index: usize) -> RepeatState {
        self.repeat = self.repeat.toggle(index);
        self.pending_select = None;
        self.active = match self.repeat {
            RepeatState::None => self.active,
            RepeatState::Single(i) | RepeatState::Range(i, _) => Some(i),
        };
        self.repeat
    }

    /// Loop start to jump back to when the media reports it has ended
    pub fn restart_point(&self, timeline: &[TimedSentence]) -> Option<f64> {
        self.repeat.loop_window(timeline).map(|(start, _)| start)
    }

    pub fn evaluate(&mut self, timeline: &[TimedSentence], time: f64) -> TickDecision {
        let seek_to = match self.repeat.loop_window(timeline) {
            Some((start, end)) if time >= end => Some(start),
            _ => None,
        };
        let head = seek_to.unwrap_or(time);

        let active = match self.pending_select.take() {
            Some(index) => Some(index),
            None => match self.repeat {
                RepeatState::None => find_active_sentence(timeline, head),
                RepeatState::Single(index) => Some(index),
                RepeatState::Range(first, second) => {
                    Some(range_active_sentence(timeline, first, second, head))
                }
            },
        };
        self.active = active;

        TickDecision { active, seek_to }
    }
}
