use crate::{DomainError, SamplePoint};

/// Evenly spaced offsets strictly inside `(0, duration)`.
///
/// The media is cut into `count + 1` equal intervals and one point is taken at
/// each inner boundary, so neither the first nor the last instant is sampled.
pub fn sample_points(duration_seconds: f64, count: u32) -> Result<Vec<SamplePoint>, DomainError> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(DomainError::validation(format!(
            "media duration must be positive, got {duration_seconds}"
        )));
    }
    if count == 0 {
        return Err(DomainError::validation("sample count must be at least 1"));
    }

    let interval = duration_seconds / (f64::from(count) + 1.0);
    Ok((1..=count)
        .map(|index| SamplePoint {
            index,
            offset_seconds: interval * f64::from(index),
        })
        .collect())
}

pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
