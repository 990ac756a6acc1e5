//! Angular subdivision of the aperture.
//!
//! Generation `n` splits `[offset - aperture, offset + aperture]` into `2^n`
//! equal slots. Bisecting every slot keeps the previous boundaries in place,
//! so the boundaries of `n` are a subset of those of `n + 1`.

use super::types::AngleInterval;

/// The `2^n` slots of generation `n`, in ascending order.
pub fn generation_angles(aperture: f64, n: usize, offset: f64) -> Vec<AngleInterval> {
    generation_boundaries(aperture, n, offset)
        .windows(2)
        .map(|pair| AngleInterval::new(pair[0], pair[1]))
        .collect()
}

/// The `2^n + 1` slot boundaries of generation `n`, both ends included.
pub fn generation_boundaries(aperture: f64, n: usize, offset: f64) -> Vec<f64> {
    assert!(n >= 1, "generation_angles needs n >= 1, got {n}");
    assert!(aperture > 0.0, "aperture must be positive, got {aperture}");
    linspace(offset - aperture, offset + aperture, (1usize << n) + 1)
}

/// The `2^n - 1` interior boundaries of generation `n`.
pub fn separating_angles(aperture: f64, n: usize, offset: f64) -> Vec<f64> {
    let mut boundaries = generation_boundaries(aperture, n, offset);
    boundaries.pop();
    boundaries.remove(0);
    boundaries
}

fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let divisions = (count - 1) as f64;
    let step = (stop - start) / divisions;
    let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
    if let Some(last) = values.last_mut() {
        *last = stop;
    }
    values
}

/// Tolerance under which two boundaries count as the same line.
///
/// `ratio` of the smallest gap between consecutive boundaries, or the whole
/// aperture when there is nothing to compare.
pub fn dedup_tolerance(boundaries: &[f64], aperture: f64, ratio: f64) -> f64 {
    if boundaries.len() < 2 {
        return aperture;
    }
    let min_gap = boundaries
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .fold(f64::INFINITY, f64::min);
    min_gap * ratio
}

/// Boundaries already drawn by shallower generations, kept sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlottedAngleSet {
    angles: Vec<f64>,
}

impl PlottedAngleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.angles
    }

    /// Whether some plotted angle lies strictly within `tolerance` of `theta`.
    pub fn contains_within(&self, theta: f64, tolerance: f64) -> bool {
        for &plotted in &self.angles {
            if (plotted - theta).abs() < tolerance {
                return true;
            }
            if plotted > theta + tolerance {
                break;
            }
        }
        false
    }

    /// Same answer as [`Self::contains_within`] without the early exit.
    pub fn contains_within_exhaustive(&self, theta: f64, tolerance: f64) -> bool {
        self.angles
            .iter()
            .any(|plotted| (plotted - theta).abs() < tolerance)
    }

    /// Boundaries of `candidates` that are not plotted yet.
    pub fn filter_new(&self, candidates: &[f64], tolerance: f64) -> Vec<f64> {
        candidates
            .iter()
            .copied()
            .filter(|theta| !self.contains_within(*theta, tolerance))
            .collect()
    }

    pub fn merge(&mut self, drawn: &[f64]) {
        self.angles.extend_from_slice(drawn);
        self.angles.sort_by(f64::total_cmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(intervals: &[AngleInterval]) -> Vec<(f64, f64)> {
        intervals.iter().map(|i| (i.start, i.end)).collect()
    }

    #[test]
    fn first_generation_halves_aperture() {
        assert_eq!(
            pairs(&generation_angles(100.0, 1, 0.0)),
            vec![(-100.0, 0.0), (0.0, 100.0)]
        );
    }

    #[test]
    fn second_generation_quarters() {
        assert_eq!(
            pairs(&generation_angles(120.0, 2, 0.0)),
            vec![(-120.0, -60.0), (-60.0, 0.0), (0.0, 60.0), (60.0, 120.0)]
        );
    }

    #[test]
    fn third_generation_eighths() {
        assert_eq!(
            pairs(&generation_angles(120.0, 3, 0.0)),
            vec![
                (-120.0, -90.0),
                (-90.0, -60.0),
                (-60.0, -30.0),
                (-30.0, 0.0),
                (0.0, 30.0),
                (30.0, 60.0),
                (60.0, 90.0),
                (90.0, 120.0),
            ]
        );
    }

    #[test]
    fn offset_shifts_span() {
        let intervals = generation_angles(90.0, 1, 10.0);
        assert_eq!(pairs(&intervals), vec![(-80.0, 10.0), (10.0, 100.0)]);
    }

    #[test]
    fn intervals_tile_the_aperture() {
        for aperture in [1.0, 37.5, 150.0, 180.0] {
            for n in 1..=9 {
                let intervals = generation_angles(aperture, n, 0.0);
                assert_eq!(intervals.len(), 1 << n);
                assert_eq!(intervals[0].start, -aperture);
                assert_eq!(intervals[intervals.len() - 1].end, aperture);
                for pair in intervals.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
                let total: f64 = intervals.iter().map(AngleInterval::width).sum();
                assert!((total - 2.0 * aperture).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn boundaries_of_next_generation_are_a_superset() {
        for n in 1..9 {
            let coarse = generation_boundaries(150.0, n, 0.0);
            let fine = generation_boundaries(150.0, n + 1, 0.0);
            assert_eq!(fine.len(), 2 * coarse.len() - 1);
            for theta in coarse {
                assert!(fine.iter().any(|f| (f - theta).abs() < 1e-9));
            }
        }
    }

    #[test]
    fn separating_angles_drop_the_ends() {
        assert_eq!(separating_angles(150.0, 1, 0.0), vec![0.0]);
        assert_eq!(separating_angles(120.0, 2, 0.0), vec![-60.0, 0.0, 60.0]);
        assert_eq!(separating_angles(150.0, 5, 0.0).len(), 31);
    }

    #[test]
    #[should_panic]
    fn generation_zero_is_rejected() {
        generation_angles(150.0, 0, 0.0);
    }

    #[test]
    fn tolerance_uses_aperture_for_single_boundary() {
        assert_eq!(dedup_tolerance(&[0.0], 150.0, 0.1), 150.0);
        assert_eq!(dedup_tolerance(&[], 150.0, 0.1), 150.0);
        assert!((dedup_tolerance(&[-60.0, 0.0, 60.0], 120.0, 0.1) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn filter_skips_plotted_boundaries() {
        let mut plotted = PlottedAngleSet::new();
        plotted.merge(&[0.0]);
        let fresh = plotted.filter_new(&[-75.0, 0.0 + 1e-12, 75.0], 7.5);
        assert_eq!(fresh, vec![-75.0, 75.0]);
        plotted.merge(&fresh);
        assert_eq!(plotted.as_slice(), &[-75.0, 0.0, 75.0]);
    }

    #[test]
    fn early_exit_matches_exhaustive_scan() {
        let mut plotted = PlottedAngleSet::new();
        for n in 1..=7 {
            let candidates = separating_angles(150.0, n, 0.0);
            let tolerance = dedup_tolerance(&candidates, 150.0, 0.1);
            for theta in &candidates {
                assert_eq!(
                    plotted.contains_within(*theta, tolerance),
                    plotted.contains_within_exhaustive(*theta, tolerance)
                );
            }
            let fresh = plotted.filter_new(&candidates, tolerance);
            assert_eq!(fresh.len(), 1 << (n - 1));
            plotted.merge(&fresh);
        }
        assert_eq!(plotted.len(), 127);
    }
}
