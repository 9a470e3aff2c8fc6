use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::entities::MomentDraft;
use crate::domain::services::sampling::nearest_thumbnail;
use crate::domain::value_objects::analysis::normalize_confidence;
use crate::domain::value_objects::{
    DetectedFace, DetectedLabel, MomentKind, Thumbnail, TimeRange, TranscriptSegment,
};

const MAX_TAGS: usize = 5;
const MAX_DESCRIPTION_CHARS: usize = 280;

/// Everything the analysis steps produced for one file.
#[derive(Debug, Clone, Copy)]
pub struct SegmentationInput<'a> {
    pub file_id: Uuid,
    pub project_id: Uuid,
    pub duration: f64,
    pub transcript: &'a [TranscriptSegment],
    pub labels: &'a [DetectedLabel],
    pub faces: &'a [DetectedFace],
    pub shots: &'a [TimeRange],
    pub thumbnails: &'a [Thumbnail],
}

/// Turns raw analysis output into moment drafts.
///
/// Every transcript line becomes a speech moment. Every shot window becomes a
/// visual moment if labels overlap it, a faces moment if faces were seen in
/// it, and a plain shot moment if neither.
pub fn build_moment_drafts(input: SegmentationInput<'_>) -> Vec<MomentDraft> {
    let mut drafts = Vec::new();

    for segment in input.transcript {
        if let Some(draft) = speech_draft(&input, segment) {
            drafts.push(draft);
        }
    }

    for window in input.shots {
        let labels = labels_in(input.labels, window);
        let faces: Vec<&DetectedFace> = input
            .faces
            .iter()
            .filter(|face| window.contains(face.timestamp))
            .collect();

        if !labels.is_empty() {
            drafts.push(visual_draft(&input, window, &labels));
        }
        if !faces.is_empty() {
            drafts.push(faces_draft(&input, window, &faces));
        }
        if labels.is_empty() && faces.is_empty() {
            drafts.push(shot_draft(&input, window));
        }
    }

    drafts
}

fn speech_draft(input: &SegmentationInput<'_>, segment: &TranscriptSegment) -> Option<MomentDraft> {
    let text = segment.text.trim();
    if text.is_empty() {
        return None;
    }
    let end = if input.duration > segment.start_time {
        segment.end_time.min(input.duration)
    } else {
        segment.end_time
    };
    let range = TimeRange::new(segment.start_time, end).ok()?;

    let labels = labels_in(input.labels, &range);
    let has_faces = input.faces.iter().any(|face| range.contains(face.timestamp));

    let mut quality: f32 = 0.7;
    if has_faces {
        quality += 0.2;
    }
    if !labels.is_empty() {
        quality += 0.1;
    }

    Some(MomentDraft {
        file_id: input.file_id,
        project_id: input.project_id,
        start_time_seconds: range.start(),
        end_time_seconds: range.end(),
        kind: MomentKind::Speech,
        description: truncate_chars(text, MAX_DESCRIPTION_CHARS),
        transcript: Some(text.to_string()),
        tags: tag_names(&labels),
        confidence: normalize_confidence(segment.confidence),
        quality_score: quality.min(1.0),
        face_data: None,
        visual_data: None,
        speaker: segment.speaker.clone(),
        thumbnail_path: thumbnail_for(input.thumbnails, &range),
    })
}

fn visual_draft(
    input: &SegmentationInput<'_>,
    window: &TimeRange,
    labels: &[&DetectedLabel],
) -> MomentDraft {
    let tags = tag_names(labels);
    let confidences: Vec<f32> = labels
        .iter()
        .map(|label| normalize_confidence(label.confidence))
        .collect();
    let top = confidences.iter().cloned().fold(0.0f32, f32::max);

    MomentDraft {
        file_id: input.file_id,
        project_id: input.project_id,
        start_time_seconds: window.start(),
        end_time_seconds: window.end(),
        kind: MomentKind::Visual,
        description: format!("Scene: {}", tags.join(", ")),
        transcript: None,
        tags,
        confidence: mean(&confidences),
        quality_score: (0.5 + 0.5 * top).min(1.0),
        face_data: None,
        visual_data: serde_json::to_value(labels).ok(),
        speaker: None,
        thumbnail_path: thumbnail_for(input.thumbnails, window),
    }
}

fn faces_draft(
    input: &SegmentationInput<'_>,
    window: &TimeRange,
    faces: &[&DetectedFace],
) -> MomentDraft {
    let confidences: Vec<f32> = faces
        .iter()
        .map(|face| normalize_confidence(face.confidence))
        .collect();
    let confidence = mean(&confidences);

    let mut seen = HashSet::new();
    let emotions: Vec<String> = faces
        .iter()
        .flat_map(|face| face.emotions.iter())
        .map(|emotion| emotion.trim().to_lowercase())
        .filter(|emotion| !emotion.is_empty() && seen.insert(emotion.clone()))
        .collect();

    let mut description = if faces.len() == 1 {
        "1 face on camera".to_string()
    } else {
        format!("{} faces on camera", faces.len())
    };
    if !emotions.is_empty() {
        description.push_str(&format!(" ({})", emotions.join(", ")));
    }

    let mut tags = vec!["faces".to_string()];
    tags.extend(emotions.into_iter().take(MAX_TAGS - 1));

    MomentDraft {
        file_id: input.file_id,
        project_id: input.project_id,
        start_time_seconds: window.start(),
        end_time_seconds: window.end(),
        kind: MomentKind::Faces,
        description,
        transcript: None,
        tags,
        confidence,
        quality_score: (0.5 + 0.5 * confidence).min(1.0),
        face_data: serde_json::to_value(faces).ok(),
        visual_data: None,
        speaker: None,
        thumbnail_path: thumbnail_for(input.thumbnails, window),
    }
}

fn shot_draft(input: &SegmentationInput<'_>, window: &TimeRange) -> MomentDraft {
    MomentDraft {
        file_id: input.file_id,
        project_id: input.project_id,
        start_time_seconds: window.start(),
        end_time_seconds: window.end(),
        kind: MomentKind::Shot,
        description: format!(
            "Footage from {} to {}",
            format_timestamp(window.start()),
            format_timestamp(window.end())
        ),
        transcript: None,
        tags: vec!["shot".to_string()],
        confidence: 0.5,
        quality_score: 0.5,
        face_data: None,
        visual_data: None,
        speaker: None,
        thumbnail_path: thumbnail_for(input.thumbnails, window),
    }
}

fn labels_in<'a>(labels: &'a [DetectedLabel], range: &TimeRange) -> Vec<&'a DetectedLabel> {
    let mut matching: Vec<&DetectedLabel> = labels
        .iter()
        .filter(|label| !label.name.trim().is_empty())
        .filter(|label| match (label.start_time, label.end_time) {
            (Some(start), Some(end)) => start < range.end() && range.start() < end.max(start),
            (Some(at), None) | (None, Some(at)) => range.contains(at),
            (None, None) => true,
        })
        .collect();
    matching.sort_by(|a, b| {
        normalize_confidence(b.confidence).total_cmp(&normalize_confidence(a.confidence))
    });
    matching
}

fn tag_names(labels: &[&DetectedLabel]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .map(|label| label.name.trim().to_lowercase())
        .filter(|name| seen.insert(name.clone()))
        .take(MAX_TAGS)
        .collect()
}

fn thumbnail_for(thumbnails: &[Thumbnail], range: &TimeRange) -> Option<String> {
    nearest_thumbnail(thumbnails, range.start()).map(|thumb| thumb.path.clone())
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// `mm:ss`, or `h:mm:ss` past the hour.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::sampling::{fixed_interval_windows, thumbnail_plan};

    fn label(name: &str, confidence: f32, start: Option<f64>, end: Option<f64>) -> DetectedLabel {
        DetectedLabel {
            name: name.to_string(),
            confidence,
            start_time: start,
            end_time: end,
        }
    }

    fn face(timestamp: f64, emotions: &[&str]) -> DetectedFace {
        DetectedFace {
            timestamp,
            confidence: 98.0,
            bounding_box: None,
            emotions: emotions.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_builds_each_kind() {
        let file_id = Uuid::new_v4();
        let transcript = vec![
            TranscriptSegment {
                start_time: 2.0,
                end_time: 6.0,
                text: "  I take you to be my husband ".to_string(),
                confidence: 0.95,
                speaker: Some("spk_0".to_string()),
            },
            TranscriptSegment {
                start_time: 7.0,
                end_time: 8.0,
                text: "   ".to_string(),
                confidence: 0.9,
                speaker: None,
            },
        ];
        let labels = vec![label("Bouquet", 91.0, Some(1.0), Some(4.0))];
        let faces = vec![face(3.0, &["HAPPY"]), face(4.5, &["happy", "calm"])];
        let shots = fixed_interval_windows(20.0, 10.0).unwrap();
        let thumbnails = thumbnail_plan(file_id, 20.0, 5.0).unwrap();

        let drafts = build_moment_drafts(SegmentationInput {
            file_id,
            project_id: Uuid::new_v4(),
            duration: 20.0,
            transcript: &transcript,
            labels: &labels,
            faces: &faces,
            shots: &shots,
            thumbnails: &thumbnails,
        });

        let kinds: Vec<MomentKind> = drafts.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MomentKind::Speech,
                MomentKind::Visual,
                MomentKind::Faces,
                MomentKind::Shot
            ]
        );

        let speech = &drafts[0];
        assert_eq!(speech.description, "I take you to be my husband");
        assert_eq!(speech.tags, vec!["bouquet".to_string()]);
        assert!((speech.quality_score - 1.0).abs() < 1e-6);
        assert_eq!(speech.speaker.as_deref(), Some("spk_0"));

        let visual = &drafts[1];
        assert_eq!(visual.description, "Scene: bouquet");
        assert!((visual.confidence - 0.91).abs() < 1e-6);

        let faces_moment = &drafts[2];
        assert_eq!(faces_moment.description, "2 faces on camera (happy, calm)");
        assert_eq!(faces_moment.tags, vec!["faces", "happy", "calm"]);

        let shot = &drafts[3];
        assert_eq!(shot.description, "Footage from 00:10 to 00:20");
        assert_eq!(
            shot.thumbnail_path,
            Some(format!("thumbnails/{}/thumb_0002.jpg", file_id))
        );
    }

    #[test]
    fn test_every_draft_has_valid_range() {
        let transcript = vec![TranscriptSegment {
            start_time: 58.0,
            end_time: 75.0,
            text: "Cheers to the happy couple".to_string(),
            confidence: 0.8,
            speaker: None,
        }];
        let shots = fixed_interval_windows(60.0, 7.0).unwrap();

        let drafts = build_moment_drafts(SegmentationInput {
            file_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            duration: 60.0,
            transcript: &transcript,
            labels: &[],
            faces: &[],
            shots: &shots,
            thumbnails: &[],
        });

        assert!(
            drafts
                .iter()
                .all(|d| d.start_time_seconds < d.end_time_seconds)
        );
        assert_eq!(drafts[0].end_time_seconds, 60.0);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(187.9), "03:07");
        assert_eq!(format_timestamp(3723.0), "1:02:03");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
