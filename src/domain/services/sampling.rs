use uuid::Uuid;

use crate::domain::value_objects::{Thumbnail, TimeRange};

/// Splits `[0, duration)` into consecutive windows of `interval` seconds.
/// The last window is cut short at `duration`.
pub fn fixed_interval_windows(duration: f64, interval: f64) -> Result<Vec<TimeRange>, String> {
    validate(duration, interval)?;

    let mut windows = Vec::new();
    let mut index = 0u32;
    loop {
        let start = f64::from(index) * interval;
        if start >= duration {
            break;
        }
        let end = (start + interval).min(duration);
        windows.push(TimeRange::new(start, end)?);
        index += 1;
    }
    Ok(windows)
}

/// Timestamps and storage names of the frames to extract for a file:
/// one every `interval` seconds starting at 0.
pub fn thumbnail_plan(file_id: Uuid, duration: f64, interval: f64) -> Result<Vec<Thumbnail>, String> {
    validate(duration, interval)?;

    let mut thumbnails = Vec::new();
    let mut index = 0u32;
    loop {
        let timestamp = f64::from(index) * interval;
        if timestamp >= duration {
            break;
        }
        thumbnails.push(Thumbnail {
            timestamp,
            path: format!("thumbnails/{}/thumb_{:04}.jpg", file_id, index),
        });
        index += 1;
    }
    Ok(thumbnails)
}

/// The thumbnail taken closest to `seconds`.
pub fn nearest_thumbnail(thumbnails: &[Thumbnail], seconds: f64) -> Option<&Thumbnail> {
    thumbnails.iter().min_by(|a, b| {
        (a.timestamp - seconds)
            .abs()
            .total_cmp(&(b.timestamp - seconds).abs())
    })
}

fn validate(duration: f64, interval: f64) -> Result<(), String> {
    if !(interval.is_finite() && interval > 0.0) {
        return Err(format!("Sampling interval must be positive, got {}", interval));
    }
    if !(duration.is_finite() && duration > 0.0) {
        return Err(format!("Video duration must be positive, got {}", duration));
    }
    Ok(())
}
