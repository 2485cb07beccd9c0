//! The listening-drill shape every sentence is rendered into.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSegment {
    Silence,
    Clip,
}

/// silence, clip, silence, clip, silence, clip, silence
pub const DRILL_PATTERN: [PatternSegment; 7] = [
    PatternSegment::Silence,
    PatternSegment::Clip,
    PatternSegment::Silence,
    PatternSegment::Clip,
    PatternSegment::Silence,
    PatternSegment::Clip,
    PatternSegment::Silence,
];

pub const CLIP_REPETITIONS: usize = 3;

/// Lay out one sentence's drill: the clip three times, surrounded and
/// separated by the same short silence. `T` is whatever identifies a
/// segment (a path, a duration, ...).
pub fn build_pattern<T: Clone>(silence: &T, clip: &T) -> Vec<T> {
    DRILL_PATTERN
        .iter()
        .map(|segment| match segment {
            PatternSegment::Silence => silence.clone(),
            PatternSegment::Clip => clip.clone(),
        })
        .collect()
}

/// Lay out the whole track: each sentence's drill with a long silence
/// between consecutive sentences (none before the first or after the last)
pub fn build_track<T: Clone>(drills: &[T], gap: &T) -> Vec<T> {
    let mut track = Vec::with_capacity(drills.len() * 2);
    for (index, drill) in drills.iter().enumerate() {
        if index > 0 {
            track.push(gap.clone());
        }
        track.push(drill.clone());
    }
    track
}
