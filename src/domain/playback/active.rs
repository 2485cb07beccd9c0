use super::repeat::union_window;
use crate::domain::lesson::TimedSentence;

/// Among the candidates whose `[start, end)` window contains `time`,
/// pick the later-starting one; equal starts go to the higher index.
fn latest_containing<'a>(
    candidates: impl Iterator<Item = (usize, &'a TimedSentence)>,
    time: f64,
) -> Option<usize> {
    candidates
        .filter(|(_, sentence)| sentence.contains(time))
        .max_by(|(ia, a), (ib, b)| a.start.total_cmp(&b.start).then(ia.cmp(ib)))
        .map(|(index, _)| index)
}

/// Sentence under the play-head during free play.
///
/// Generated timelines never overlap, but edited ones may; overlaps are
/// resolved in favour of the later-starting sentence.
pub fn find_active_sentence(timeline: &[TimedSentence], time: f64) -> Option<usize> {
    latest_containing(timeline.iter().enumerate(), time)
}

/// Sentence to highlight while looping the range `first..second`
pub fn range_active_sentence(
    timeline: &[TimedSentence],
    first: usize,
    second: usize,
    time: f64,
) -> usize {
    let inside_union = union_window(timeline, first, second)
        .map(|(start, end)| time >= start && time < end)
        .unwrap_or(false);
    if !inside_union {
        return first;
    }

    let endpoints = [first, second]
        .into_iter()
        .filter_map(|index| timeline.get(index).map(|sentence| (index, sentence)));
    latest_containing(endpoints, time).unwrap_or(first)
}
