//! Radii of the concentric rings.
//!
//! Generation `n` (1 = parents of the root person) is an annulus made of a
//! marriage band followed by a person band. Both radii are prefix sums of
//! the per-generation extents, scaled by the base circle radius.

use super::error::LayoutError;

/// Radius of generation `n`'s marriage arc (outer edge of its marriage band).
pub fn radius_marriage(
    dims_people: &[f64],
    dims_marriage: &[f64],
    base_radius: f64,
    n: usize,
) -> Result<f64, LayoutError> {
    if n == 0 {
        return Err(LayoutError::NoMarriageBand);
    }
    Ok(base_radius * (1.0 + prefix_sum(dims_people, n - 1) + prefix_sum(dims_marriage, n)))
}

/// Outer radius of generation `n`'s person band; `base_radius` for `n = 0`.
pub fn radius_people(
    dims_people: &[f64],
    dims_marriage: &[f64],
    base_radius: f64,
    n: usize,
) -> f64 {
    base_radius * (1.0 + prefix_sum(dims_people, n) + prefix_sum(dims_marriage, n))
}

// Prefixes longer than the slice sum the whole slice.
fn prefix_sum(values: &[f64], len: usize) -> f64 {
    values.iter().take(len).sum()
}
