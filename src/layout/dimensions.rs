use serde::{Deserialize, Serialize};

use super::error::LayoutError;
use super::radius::{radius_marriage, radius_people};
use super::types::GenerationBand;

/// A radial extent repeated over `occurrences` consecutive generations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    pub occurrences: usize,
}

impl Dimension {
    pub const fn new(value: f64, occurrences: usize) -> Self {
        Self { value, occurrences }
    }
}

/// Per-generation extents, indexed by `generation - 1`.
///
/// People and marriage extents are multiples of the base radius; stroke
/// widths are absolute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionTable {
    pub people: Vec<f64>,
    pub marriage: Vec<f64>,
    pub stroke: Vec<f64>,
}

impl DimensionTable {
    pub fn expand(
        people: &[Dimension],
        marriage: &[Dimension],
        stroke: &[Dimension],
        generations: usize,
    ) -> Result<Self, LayoutError> {
        Ok(Self {
            people: expand_axis("people", people, generations)?,
            marriage: expand_axis("marriage", marriage, generations)?,
            stroke: expand_axis("stroke", stroke, generations)?,
        })
    }

    pub fn generations(&self) -> usize {
        self.people
            .len()
            .min(self.marriage.len())
            .min(self.stroke.len())
    }

    pub fn radius_marriage(&self, base_radius: f64, n: usize) -> Result<f64, LayoutError> {
        radius_marriage(&self.people, &self.marriage, base_radius, n)
    }

    pub fn radius_people(&self, base_radius: f64, n: usize) -> f64 {
        radius_people(&self.people, &self.marriage, base_radius, n)
    }

    pub fn band(&self, base_radius: f64, n: usize) -> Result<GenerationBand, LayoutError> {
        let marriage_radius = self.radius_marriage(base_radius, n)?;
        Ok(GenerationBand {
            generation: n,
            inner_radius: self.radius_people(base_radius, n - 1),
            marriage_radius,
            outer_radius: self.radius_people(base_radius, n),
        })
    }

    /// Stroke width of generation `n` (`n >= 1`).
    pub fn stroke_width(&self, n: usize) -> f64 {
        self.stroke[n - 1]
    }
}

fn expand_axis(
    axis: &'static str,
    runs: &[Dimension],
    generations: usize,
) -> Result<Vec<f64>, LayoutError> {
    let values: Vec<f64> = runs
        .iter()
        .flat_map(|dim| std::iter::repeat_n(dim.value, dim.occurrences))
        .take(generations)
        .collect();
    if values.len() < generations {
        return Err(LayoutError::DimensionTableTooShort {
            axis,
            len: values.len(),
            required: generations,
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_runs_in_order_and_truncates() {
        let table = DimensionTable::expand(
            &[Dimension::new(1.5, 3), Dimension::new(2.5, 2), Dimension::new(5.0, 4)],
            &[Dimension::new(0.5, 9)],
            &[Dimension::new(1.0, 3), Dimension::new(0.65, 2), Dimension::new(0.3, 4)],
            6,
        )
        .unwrap();
        assert_eq!(table.people, vec![1.5, 1.5, 1.5, 2.5, 2.5, 5.0]);
        assert_eq!(table.marriage, vec![0.5; 6]);
        assert_eq!(table.stroke, vec![1.0, 1.0, 1.0, 0.65, 0.65, 0.3]);
        assert_eq!(table.generations(), 6);
        assert_eq!(table.stroke_width(4), 0.65);
    }

    #[test]
    fn rejects_short_axis() {
        let err = DimensionTable::expand(
            &[Dimension::new(1.0, 2)],
            &[Dimension::new(0.5, 5)],
            &[Dimension::new(1.0, 5)],
            4,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::DimensionTableTooShort {
                axis: "people",
                len: 2,
                required: 4,
            }
        );
    }

    #[test]
    fn band_chains_radii() {
        let table = DimensionTable::expand(
            &[Dimension::new(1.0, 3)],
            &[Dimension::new(0.5, 3)],
            &[Dimension::new(1.0, 3)],
            3,
        )
        .unwrap();
        let first = table.band(10.0, 1).unwrap();
        let second = table.band(10.0, 2).unwrap();
        assert_eq!(first.inner_radius, 10.0);
        assert_eq!(first.marriage_radius, 15.0);
        assert_eq!(first.outer_radius, 25.0);
        assert_eq!(second.inner_radius, first.outer_radius);
        assert_eq!(table.band(10.0, 0), Err(LayoutError::NoMarriageBand));
    }
}
