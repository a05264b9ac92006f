//! Capture timestamp selection.
//!
//! Given a video's duration, the number of seconds to skip at the start, and
//! the number of grid cells, this module computes the instants at which
//! frames are captured.

use crate::error::SheetError;

/// Compute `count` evenly-distributed capture timestamps.
///
/// Timestamps are centered within their time slice rather than biased toward
/// the slice start:
///
/// ```text
/// t_i = skip + (i + 0.5) · (duration − skip) / count
/// ```
///
/// Centering gives more representative captures (the first sample is not
/// glued to the skip boundary) and keeps every sample strictly inside
/// `[skip, duration)`, so no capture lands on the end of the stream where
/// decoders misbehave.
///
/// The returned timestamps are strictly increasing.
///
/// # Errors
///
/// - [`SheetError::TooShort`] if `duration <= skip`.
/// - [`SheetError::Config`] if `count` is zero.
pub fn sample_timestamps(duration: f64, skip: f64, count: u32) -> Result<Vec<f64>, SheetError> {
    if count == 0 {
        return Err(SheetError::Config {
            reason: "thumbnail grid needs at least one cell".to_string(),
        });
    }
    if duration <= skip {
        return Err(SheetError::TooShort { duration, skip });
    }

    let range = duration - skip;
    let slice = range / f64::from(count);
    let timestamps = (0..count)
        .map(|index| skip + (f64::from(index) + 0.5) * slice)
        .collect();

    Ok(timestamps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_exactly_count_strictly_increasing_timestamps() {
        for (columns, rows) in [(1u32, 1u32), (4, 3), (5, 5), (10, 1)] {
            let count = columns * rows;
            let timestamps = sample_timestamps(600.0, 10.0, count).unwrap();

            assert_eq!(timestamps.len(), count as usize);
            for pair in timestamps.windows(2) {
                assert!(pair[1] > pair[0], "timestamps must strictly increase");
            }
        }
    }

    #[test]
    fn all_timestamps_within_sample_range() {
        let timestamps = sample_timestamps(120.0, 5.0, 16).unwrap();
        for timestamp in &timestamps {
            assert!(*timestamp >= 5.0, "sample before skip: {timestamp}");
            assert!(*timestamp < 120.0, "sample at or past duration: {timestamp}");
        }
    }

    #[test]
    fn centered_distribution_matches_reference_scenario() {
        // duration=596.46, skip=10, 4x3 grid.
        let timestamps = sample_timestamps(596.46, 10.0, 12).unwrap();
        assert_eq!(timestamps.len(), 12);

        let first = timestamps[0];
        let last = timestamps[11];
        // First sample sits half a slice past the skip, the last half a
        // slice before the end of the video.
        assert!((first - (10.0 + 586.46 / 24.0)).abs() < 1e-9);
        assert!((first - 34.44).abs() < 0.01);
        assert!((last - (10.0 + 11.5 * 586.46 / 12.0)).abs() < 1e-9);
        assert!((last - 572.02).abs() < 0.01);
        assert!(last < 596.46);
    }

    #[test]
    fn too_short_iff_duration_not_greater_than_skip() {
        assert!(matches!(
            sample_timestamps(5.0, 10.0, 12),
            Err(SheetError::TooShort { .. })
        ));
        assert!(matches!(
            sample_timestamps(10.0, 10.0, 1),
            Err(SheetError::TooShort { .. })
        ));
        // Just above the skip is fine.
        assert!(sample_timestamps(10.001, 10.0, 1).is_ok());
    }

    #[test]
    fn zero_cells_is_rejected() {
        assert!(matches!(
            sample_timestamps(100.0, 0.0, 0),
            Err(SheetError::Config { .. })
        ));
    }

    #[test]
    fn single_sample_lands_mid_range() {
        let timestamps = sample_timestamps(100.0, 0.0, 1).unwrap();
        assert_eq!(timestamps.len(), 1);
        assert!((timestamps[0] - 50.0).abs() < 1e-9);
    }
}
