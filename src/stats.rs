use serde::Serialize;

/// Arithmetic mean of a sample. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n−1 denominator). Zero for a single value,
/// `NaN` for an empty slice.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    match values.len() {
        0 => f64::NAN,
        1 => 0.0,
        n => {
            let mu = mean(values);
            let ss: f64 = values.iter().map(|v| (v - mu).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        }
    }
}

/// Running descriptive statistics, built by folding values in with
/// [`Summary::push`] and combining partial results with [`Summary::merge`].
///
/// Mean and variance use Welford's update; the geometric mean is carried as a
/// sum of logs and is only defined while every value seen is strictly positive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    count:        u64,
    mean:         f64,
    m2:           f64,
    log_sum:      f64,
    non_positive: bool,
}

impl Summary {
    #[must_use]
    pub fn push(self, value: f64) -> Self {
        let count = self.count + 1;
        let delta = value - self.mean;
        let mean  = self.mean + delta / count as f64;
        let m2    = self.m2 + delta * (value - mean);
        // NaN fails `> 0.0` and so also marks the geometric mean undefined
        let positive = value > 0.0;
        Summary {
            count,
            mean,
            m2,
            log_sum: if positive { self.log_sum + value.ln() } else { self.log_sum },
            non_positive: self.non_positive || !positive,
        }
    }

    /// Combines two summaries as if every value had been pushed into one.
    #[must_use]
    pub fn merge(self, other: Summary) -> Self {
        if self.count == 0 { return other; }
        if other.count == 0 { return self; }
        let count = self.count + other.count;
        let (na, nb, n) = (self.count as f64, other.count as f64, count as f64);
        let delta = other.mean - self.mean;
        Summary {
            count,
            mean:         self.mean + delta * nb / n,
            m2:           self.m2 + other.m2 + delta * delta * na * nb / n,
            log_sum:      self.log_sum + other.log_sum,
            non_positive: self.non_positive || other.non_positive,
        }
    }

    pub fn count(&self) -> u64 { self.count }

    /// Arithmetic mean; `NaN` when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Sample standard deviation; `0.0` for one value, `NaN` when empty.
    pub fn std_dev(&self) -> f64 {
        match self.count {
            0 => f64::NAN,
            1 => 0.0,
            n => (self.m2 / (n - 1) as f64).sqrt(),
        }
    }

    /// `None` when empty or when any value was zero, negative, or `NaN`.
    pub fn geometric_mean(&self) -> Option<f64> {
        if self.count == 0 || self.non_positive { return None; }
        Some((self.log_sum / self.count as f64).exp())
    }

    pub fn stats(&self) -> SummaryStats {
        SummaryStats {
            count:          self.count,
            mean:           self.mean(),
            geometric_mean: self.geometric_mean(),
            std_dev:        self.std_dev(),
        }
    }
}

impl FromIterator<f64> for Summary {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        iter.into_iter().fold(Summary::default(), Summary::push)
    }
}

/// Snapshot of a [`Summary`] for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub count: u64,
    pub mean: f64,
    pub geometric_mean: Option<f64>,
    pub std_dev: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool { (a - b).abs() < 1e-12 }

    #[test]
    fn test_mean_and_std_dev() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(mean(&v), 5.0));
        // population sd is 2; sample sd is sqrt(32/7)
        assert!(close(sample_std_dev(&v), (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn test_std_dev_degenerate_sizes() {
        assert_eq!(sample_std_dev(&[0.3]), 0.0);
        assert!(sample_std_dev(&[]).is_nan());
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_summary_matches_slice_helpers() {
        let v = [0.7, 0.1, 1.3, 0.9, 0.2];
        let s: Summary = v.iter().copied().collect();
        assert_eq!(s.count(), 5);
        assert!(close(s.mean(), mean(&v)), "mean {} vs {}", s.mean(), mean(&v));
        assert!(close(s.std_dev(), sample_std_dev(&v)), "sd {} vs {}", s.std_dev(), sample_std_dev(&v));
    }

    #[test]
    fn test_geometric_mean() {
        let s: Summary = [1.0, 4.0, 16.0].into_iter().collect();
        let g = s.geometric_mean().expect("all positive");
        assert!((g - 4.0).abs() < 1e-9, "Expected 4, got {g}");
    }

    #[test]
    fn test_geometric_mean_undefined_for_zero_or_nan() {
        let zero: Summary = [1.0, 0.0, 2.0].into_iter().collect();
        assert!(zero.geometric_mean().is_none(), "A zero value leaves the geometric mean undefined");
        let nan: Summary = [1.0, f64::NAN].into_iter().collect();
        assert!(nan.geometric_mean().is_none(), "A NaN value leaves the geometric mean undefined");
        assert!(Summary::default().geometric_mean().is_none());
    }

    #[test]
    fn test_empty_summary() {
        let s = Summary::default();
        assert_eq!(s.count(), 0);
        assert!(s.mean().is_nan());
        assert!(s.std_dev().is_nan());
    }

    #[test]
    fn test_merge_equals_single_fold() {
        let v = [0.5, 1.5, 0.25, 2.0, 0.75, 1.0, 3.0];
        let whole: Summary = v.iter().copied().collect();
        let left:  Summary = v[..3].iter().copied().collect();
        let right: Summary = v[3..].iter().copied().collect();
        let merged = left.merge(right);
        assert_eq!(merged.count(), whole.count());
        assert!(close(merged.mean(), whole.mean()));
        assert!(close(merged.std_dev(), whole.std_dev()));
        assert!(close(merged.geometric_mean().unwrap(), whole.geometric_mean().unwrap()));
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let s: Summary = [1.0, 2.0].into_iter().collect();
        assert_eq!(s.merge(Summary::default()), s);
        assert_eq!(Summary::default().merge(s), s);
    }
}
