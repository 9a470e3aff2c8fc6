use std::cmp::Ordering;

use crate::domain::entities::VideoMoment;

/// Picks the moments that go into a compilation.
///
/// Candidates are ranked by `confidence * quality_score` (stable, so ties keep
/// their incoming order) and taken greedily. Selection stops once the running
/// total reaches `fill_ratio * max_duration`, or at the first candidate that
/// would push the total past `max_duration`. The result is returned in
/// playback order: grouped by source file, then by start time.
pub fn select_for_compilation(
    mut candidates: Vec<VideoMoment>,
    max_duration: f64,
    fill_ratio: f64,
) -> Vec<VideoMoment> {
    candidates.sort_by(|a, b| b.weight().total_cmp(&a.weight()));

    let target = max_duration * fill_ratio;
    let mut total = 0.0;
    let mut selected = Vec::new();

    for moment in candidates {
        if total >= target {
            break;
        }
        let duration = moment.duration();
        if total + duration > max_duration {
            break;
        }
        total += duration;
        selected.push(moment);
    }

    selected.sort_by(|a, b| {
        a.file_id().cmp(&b.file_id()).then_with(|| {
            a.start_time_seconds()
                .partial_cmp(&b.start_time_seconds())
                .unwrap_or(Ordering::Equal)
        })
    });

    selected
}

pub fn total_duration(moments: &[VideoMoment]) -> f64 {
    moments.iter().map(VideoMoment::duration).sum()
}
