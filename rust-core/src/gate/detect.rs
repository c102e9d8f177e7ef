//! Per-record feature detection

use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::records::RecordLayout;

/// Feature that marks the start of a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDetector {
    /// First upward threshold crossing: `a[i-1] <= t < a[i]`
    #[default]
    PositiveThreshold,
    /// First downward threshold crossing: `a[i-1] >= t > a[i]`
    NegativeThreshold,
    /// First strict local maximum above the threshold
    Maximum,
    /// First strict local minimum below the threshold
    Minimum,
}

impl GateDetector {
    /// Scan one record from `start` and return the detected sample index
    ///
    /// Crossings report the first sample past the threshold. Extrema never
    /// report the first or last sample of the record.
    pub fn detect<T: Float>(&self, record: &[T], threshold: T, start: usize) -> Option<usize> {
        let first = start.max(1);
        let n = record.len();
        let t = threshold;

        match self {
            GateDetector::PositiveThreshold => {
                (first..n).find(|&i| record[i - 1] <= t && t < record[i])
            }
            GateDetector::NegativeThreshold => {
                (first..n).find(|&i| record[i - 1] >= t && t > record[i])
            }
            GateDetector::Maximum => (first..n.saturating_sub(1)).find(|&i| {
                let v = record[i];
                v > t && v > record[i - 1] && v > record[i + 1]
            }),
            GateDetector::Minimum => (first..n.saturating_sub(1)).find(|&i| {
                let v = record[i];
                v < t && v < record[i - 1] && v < record[i + 1]
            }),
        }
    }
}

/// Run a detector over every record of a buffer
pub fn detect_gates<T: Float>(
    samples: &[T],
    record_length: usize,
    detector: GateDetector,
    threshold: T,
    start: usize,
) -> CoreResult<Vec<Option<usize>>> {
    let layout = RecordLayout::of(samples.len(), record_length)?;
    let gates: Vec<Option<usize>> = samples
        .chunks_exact(layout.record_length())
        .map(|record| detector.detect(record, threshold, start))
        .collect();

    tracing::debug!(
        ?detector,
        records = layout.records(),
        detected = gates.iter().flatten().count(),
        "gate detection finished"
    );
    Ok(gates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAMP_DOWN: [f64; 10] = [0.0, 0.0, 0.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0, 0.0];

    #[test]
    fn test_positive_threshold() {
        assert_eq!(GateDetector::PositiveThreshold.detect(&RAMP_DOWN, 2.5, 0), Some(3));
        assert_eq!(GateDetector::PositiveThreshold.detect(&[0.0; 10], 2.5, 0), None);
        // Sample equal to the threshold does not count as above it
        assert_eq!(GateDetector::PositiveThreshold.detect(&[0.0, 1.0, 2.0], 1.0, 0), Some(2));
    }

    #[test]
    fn test_negative_threshold() {
        assert_eq!(GateDetector::NegativeThreshold.detect(&RAMP_DOWN, 2.5, 0), Some(6));
        assert_eq!(GateDetector::NegativeThreshold.detect(&RAMP_DOWN, 2.5, 7), None);
    }

    #[test]
    fn test_search_start() {
        let record = [0.0, 3.0, 0.0, 0.0, 3.0, 0.0];
        assert_eq!(GateDetector::PositiveThreshold.detect(&record, 1.0, 0), Some(1));
        assert_eq!(GateDetector::PositiveThreshold.detect(&record, 1.0, 2), Some(4));
        assert_eq!(GateDetector::PositiveThreshold.detect(&record, 1.0, 100), None);
    }

    #[test]
    fn test_extrema() {
        let record = [0.0, 1.0, 0.5, 4.0, 2.0, -3.0, -1.0, -5.0, 0.0];
        assert_eq!(GateDetector::Maximum.detect(&record, 0.0, 0), Some(1));
        assert_eq!(GateDetector::Maximum.detect(&record, 2.0, 0), Some(3));
        assert_eq!(GateDetector::Minimum.detect(&record, 0.0, 0), Some(5));
        assert_eq!(GateDetector::Minimum.detect(&record, -4.0, 0), Some(7));
        // Plateaus are not strict extrema
        assert_eq!(GateDetector::Maximum.detect(&[0.0, 2.0, 2.0, 0.0], 1.0, 0), None);
        assert_eq!(GateDetector::Maximum.detect(&[1.0f32], 0.0, 0), None);
    }

    #[test]
    fn test_detect_gates_per_record() {
        let mut samples = RAMP_DOWN.to_vec();
        samples.extend_from_slice(&[0.0; 10]);
        samples.extend_from_slice(&[0.0, 9.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        let gates = detect_gates(&samples, 10, GateDetector::PositiveThreshold, 2.5, 0).unwrap();
        assert_eq!(gates, vec![Some(3), None, Some(1)]);
        assert!(detect_gates(&samples, 7, GateDetector::Maximum, 0.0, 0).is_err());
    }
}
