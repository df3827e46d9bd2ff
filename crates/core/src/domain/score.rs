use super::DomainError;

/// An evaluation score, any finite real in `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(f64);

impl Score {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidScore(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The score in fixed-point billionths of a point, the resolution at
    /// which scores are summed.
    pub fn units(self) -> i64 {
        (self.0 * UNITS_PER_POINT as f64).round() as i64
    }
}

/// Fixed-point resolution of [`Score::units`].
pub const UNITS_PER_POINT: i64 = 1_000_000_000;

impl Default for Score {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<f64> for Score {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(value: Score) -> Self {
        value.value()
    }
}
