use serde::{Deserialize, Serialize};

/// Half-open window of a source video, in seconds. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Result<Self, String> {
        if !start.is_finite() || !end.is_finite() {
            return Err("time range bounds must be finite".to_string());
        }
        if start < 0.0 {
            return Err(format!("start time {} is negative", start));
        }
        if start >= end {
            return Err(format!(
                "start time {} must be before end time {}",
                start, end
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.start && seconds < self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_inverted_ranges() {
        assert!(TimeRange::new(5.0, 5.0).is_err());
        assert!(TimeRange::new(6.0, 5.0).is_err());
        assert!(TimeRange::new(-1.0, 5.0).is_err());
        assert!(TimeRange::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_duration_and_overlap() {
        let vows = TimeRange::new(12.0, 20.5).unwrap();
        assert!((vows.duration() - 8.5).abs() < f64::EPSILON);
        assert!(vows.contains(12.0));
        assert!(!vows.contains(20.5));

        let kiss = TimeRange::new(20.0, 25.0).unwrap();
        let exit = TimeRange::new(20.5, 30.0).unwrap();
        assert!(vows.overlaps(&kiss));
        assert!(!vows.overlaps(&exit));
    }
}
