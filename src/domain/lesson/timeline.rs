use super::model::{SentencePair, TimedSentence};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("{pairs} sentences but {durations} measured durations")]
    LengthMismatch { pairs: usize, durations: usize },
    #[error("sentence {index} has invalid measured duration {duration_ms} ms")]
    InvalidDuration { index: usize, duration_ms: f64 },
    #[error("invalid gap duration {0} ms")]
    InvalidGap(f64),
    #[error("sentence {index} ends before it starts")]
    EmptyWindow { index: usize },
    #[error("sentence {index} starts before sentence {previous} ends")]
    Overlap { previous: usize, index: usize },
}

/// Accumulates measured durations into absolute offsets.
///
/// The cursor is kept in milliseconds and only converted to seconds per
/// entry, so whole-millisecond durations produce exact offsets.
#[derive(Debug)]
pub struct TimelineBuilder {
    cursor_ms: f64,
    gap_ms: f64,
    entries: Vec<TimedSentence>,
}

impl TimelineBuilder {
    pub fn new(gap_ms: f64) -> Result<Self, TimelineError> {
        if !gap_ms.is_finite() || gap_ms < 0.0 {
            return Err(TimelineError::InvalidGap(gap_ms));
        }
        Ok(Self {
            cursor_ms: 0.0,
            gap_ms,
            entries: Vec::new(),
        })
    }

    /// Append the next sentence given the measured duration of its drill
    pub fn push(&mut self, pair: &SentencePair, duration_ms: f64) -> Result<&TimedSentence, TimelineError> {
        let index = self.entries.len();
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(TimelineError::InvalidDuration { index, duration_ms });
        }

        if index > 0 {
            self.cursor_ms += self.gap_ms;
        }

        let start_ms = self.cursor_ms;
        self.cursor_ms += duration_ms;

        self.entries.push(TimedSentence {
            text: pair.text.clone(),
            translation: pair.translation.clone(),
            start: start_ms / 1000.0,
            end: self.cursor_ms / 1000.0,
        });
        Ok(&self.entries[index])
    }

    /// Total length covered so far, in seconds
    pub fn total_seconds(&self) -> f64 {
        self.cursor_ms / 1000.0
    }

    pub fn finish(self) -> Vec<TimedSentence> {
        self.entries
    }
}

/// Build the full timeline from per-sentence drill durations and the
/// measured gap between sentences
pub fn build_timeline(
    pairs: &[SentencePair],
    durations_ms: &[f64],
    gap_ms: f64,
) -> Result<Vec<TimedSentence>, TimelineError> {
    if pairs.len() != durations_ms.len() {
        return Err(TimelineError::LengthMismatch {
            pairs: pairs.len(),
            durations: durations_ms.len(),
        });
    }

    let mut builder = TimelineBuilder::new(gap_ms)?;
    for (pair, duration_ms) in pairs.iter().zip(durations_ms) {
        builder.push(pair, *duration_ms)?;
    }
    Ok(builder.finish())
}

/// Check the invariants of generated data: every window is non-empty
/// and no two consecutive windows overlap
pub fn validate_timeline(timeline: &[TimedSentence]) -> Result<(), TimelineError> {
    for (index, sentence) in timeline.iter().enumerate() {
        if !(sentence.end > sentence.start) {
            return Err(TimelineError::EmptyWindow { index });
        }
        if index > 0 && sentence.start < timeline[index - 1].end {
            return Err(TimelineError::Overlap {
                previous: index - 1,
                index,
            });
        }
    }
    Ok(())
}
