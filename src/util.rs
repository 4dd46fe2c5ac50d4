/// Observed min/max of one criterion across a set of candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Span {
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut span = Span::default();
        for v in values {
            span.include(v);
        }
        span
    }

    #[inline]
    pub fn include(&mut self, value: f64) {
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Min-max normalization into [0, 1]. A degenerate (all-equal or empty) span maps to 0.5.
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if self.is_empty() || range <= f64::EPSILON * self.max.abs().max(1.0) {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }
}
