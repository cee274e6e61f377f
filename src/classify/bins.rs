use serde::Serialize;

/// Number of classes on the access maps.
pub const DEFAULT_CLASSES: usize = 6;

/// Where the upper bound of the classification comes from.
#[derive(Clone, Copy, Debug)]
pub enum BinReference<'a> {
    /// The maximum of the values being classified.
    Own,
    /// The maximum of a designated reference column (e.g. the 60-minute
    /// cutoff), so that maps of different cutoffs share intervals.
    Shared(&'a [f64]),
}

/// Equal-width class boundaries over `[0, max]`: `count + 1` ascending values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassificationBins {
    boundaries: Vec<f64>,
}

impl ClassificationBins {
    /// Boundaries `max * i / count` for `i` in `0..=count`. A non-positive or
    /// non-finite `max` yields all-zero boundaries.
    pub fn from_max(max: f64, count: usize) -> Self {
        let count = count.max(1);
        let max = if max.is_finite() && max > 0.0 { max } else { 0.0 };
        Self {
            boundaries: (0..=count).map(|i| max * i as f64 / count as f64).collect(),
        }
    }

    pub fn boundaries(&self) -> &[f64] { &self.boundaries }

    pub fn class_count(&self) -> usize { self.boundaries.len() - 1 }

    pub fn max(&self) -> f64 {
        self.boundaries.last().copied().unwrap_or(0.0)
    }

    /// All boundaries collapsed to zero: nothing is accessible in the
    /// reference set, so every value falls in a single "no access" category.
    pub fn is_degenerate(&self) -> bool {
        self.max() <= 0.0
    }

    /// Zero-based class of `value`, with the upper boundary of each class
    /// inclusive and values above the maximum put in the last class.
    /// `None` for degenerate bins and for non-finite or negative values.
    pub fn class_of(&self, value: f64) -> Option<usize> {
        if self.is_degenerate() || !value.is_finite() || value < 0.0 { return None }
        let last = self.class_count() - 1;
        Some(self.boundaries[1..].iter()
            .position(|&upper| value <= upper)
            .unwrap_or(last))
    }
}

/// Largest finite value, or zero when there is none.
pub fn finite_max(values: &[f64]) -> f64 {
    values.iter().copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// Compute `count` equal-width classes for `values`, bounded by the maximum
/// of `values` itself or of the shared reference column.
pub fn compute_bins(values: &[f64], reference: BinReference<'_>, count: usize) -> ClassificationBins {
    let max = match reference {
        BinReference::Own => finite_max(values),
        BinReference::Shared(reference) => finite_max(reference),
    };
    ClassificationBins::from_max(max, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_splits_into_tens() {
        let bins = ClassificationBins::from_max(60.0, DEFAULT_CLASSES);
        assert_eq!(bins.boundaries(), &[0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(bins.class_count(), 6);
        assert!(!bins.is_degenerate());
    }

    #[test]
    fn zero_reference_collapses_without_error() {
        let bins = compute_bins(&[0.0, 0.0], BinReference::Own, DEFAULT_CLASSES);
        assert_eq!(bins.boundaries(), &[0.0; 7]);
        assert!(bins.is_degenerate());
        assert_eq!(bins.class_of(0.0), None);

        let empty = compute_bins(&[], BinReference::Own, DEFAULT_CLASSES);
        assert!(empty.is_degenerate());
    }

    #[test]
    fn shared_reference_overrides_own_maximum() {
        let own = [3.0, 12.0];
        let sixty = [5.0, 30.0, 24.0];
        let bins = compute_bins(&own, BinReference::Shared(&sixty), DEFAULT_CLASSES);
        assert_eq!(bins.max(), 30.0);

        let bins = compute_bins(&own, BinReference::Own, DEFAULT_CLASSES);
        assert_eq!(bins.max(), 12.0);
    }

    #[test]
    fn non_finite_values_are_ignored_for_the_maximum() {
        let bins = compute_bins(&[f64::NAN, 6.0, f64::INFINITY], BinReference::Own, 3);
        assert_eq!(bins.boundaries(), &[0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn class_of_uses_inclusive_upper_bounds() {
        let bins = ClassificationBins::from_max(60.0, 6);
        assert_eq!(bins.class_of(0.0), Some(0));
        assert_eq!(bins.class_of(10.0), Some(0));
        assert_eq!(bins.class_of(10.5), Some(1));
        assert_eq!(bins.class_of(60.0), Some(5));
        assert_eq!(bins.class_of(75.0), Some(5));
        assert_eq!(bins.class_of(-1.0), None);
    }
}
