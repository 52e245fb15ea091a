//! Bitrate targets for H265 conversion

use crate::domain::errors::DomainError;

/// Kilobit rates derived from file size and duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateTargets {
    pub current_kbps: u64,
    pub target_kbps: u64,
    pub min_kbps: u64,
    pub max_kbps: u64,
}

impl BitrateTargets {
    /// Estimate the source bitrate and derive encoder targets from it.
    ///
    /// The target is half the current rate; min and max bracket the current
    /// rate at 70% and 130%. All values are truncated to whole kilobits.
    pub fn compute(size_bytes: u64, duration_seconds: Option<f64>) -> Result<Self, DomainError> {
        let seconds = duration_seconds
            .filter(|d| d.is_finite() && *d > 0.0)
            .ok_or(DomainError::DurationUnknown)?;

        let minutes = seconds * (1.0 / 60.0);
        let megabytes = size_bytes as f64 / 1_000_000.0;
        let rate = megabytes / (minutes * 0.0075);
        let current = rate.trunc();

        Ok(Self {
            current_kbps: current as u64,
            target_kbps: (rate / 2.0).trunc() as u64,
            min_kbps: (current * 0.7).trunc() as u64,
            max_kbps: (current * 1.3).trunc() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_follow_current_rate() {
        // 900 MB over 60 minutes: 900 / (60 * 0.0075) = 2000
        let targets = BitrateTargets::compute(900_000_000, Some(3600.0)).unwrap();
        assert_eq!(
            targets,
            BitrateTargets {
                current_kbps: 2000,
                target_kbps: 1000,
                min_kbps: 1400,
                max_kbps: 2600,
            }
        );
    }

    #[test]
    fn values_are_truncated() {
        // 1 MB over 1 minute: 1 / 0.0075 = 133.33
        let targets = BitrateTargets::compute(1_000_000, Some(60.0)).unwrap();
        assert_eq!(targets.current_kbps, 133);
        assert_eq!(targets.target_kbps, 66);
        assert_eq!(targets.min_kbps, 93);
        assert_eq!(targets.max_kbps, 172);
    }

    #[test]
    fn unknown_duration_fails() {
        assert_eq!(BitrateTargets::compute(1, None), Err(DomainError::DurationUnknown));
        assert_eq!(BitrateTargets::compute(1, Some(0.0)), Err(DomainError::DurationUnknown));
    }
}
