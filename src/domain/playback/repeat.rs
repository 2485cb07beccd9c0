use crate::domain::lesson::TimedSentence;

/// Loop mode of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatState {
    #[default]
    None,
    /// Loop one sentence
    Single(usize),
    /// Loop the union window of two sentences, in toggle order
    Range(usize, usize),
}

impl RepeatState {
    /// Apply a "toggle repeat on sentence `index`" action
    pub fn toggle(self, index: usize) -> RepeatState {
        match self {
            RepeatState::None => RepeatState::Single(index),
            RepeatState::Single(current) if current == index => RepeatState::None,
            RepeatState::Single(current) => RepeatState::Range(current, index),
            RepeatState::Range(_, _) => RepeatState::Single(index),
        }
    }

    pub fn is_repeating(&self) -> bool {
        !matches!(self, RepeatState::None)
    }

    /// The `(start, end)` interval this mode keeps the play-head inside.
    /// `None` when not repeating or when an index is outside the timeline.
    pub fn loop_window(&self, timeline: &[TimedSentence]) -> Option<(f64, f64)> {
        match *self {
            RepeatState::None => None,
            RepeatState::Single(index) => timeline.get(index).map(|s| (s.start, s.end)),
            RepeatState::Range(first, second) => union_window(timeline, first, second),
        }
    }
}

/// From the earlier start to the later end of two sentences
pub fn union_window(timeline: &[TimedSentence], first: usize, second: usize) -> Option<(f64, f64)> {
    let a = timeline.get(first)?;
    let b = timeline.get(second)?;
    Some((a.start.min(b.start), a.end.max(b.end)))
}
