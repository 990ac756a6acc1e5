use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Generation 0 is the center circle; it has no marriage band.
    #[error("no marriage band for generation 0")]
    NoMarriageBand,
    #[error("{axis} dimension table has {len} entries, {required} generations requested")]
    DimensionTableTooShort {
        axis: &'static str,
        len: usize,
        required: usize,
    },
    #[error("aperture must be in (0, 180] degrees, got {0}")]
    InvalidAperture(f64),
    #[error("rotation must be finite, got {0}")]
    InvalidRotation(f64),
    #[error("chart needs at least one generation")]
    NoGenerations,
    #[error("{requested} generations requested, at most {max} are supported")]
    TooManyGenerations { requested: usize, max: usize },
    /// The tolerance only absorbs rounding; half a slot or more would merge
    /// distinct boundaries.
    #[error("dedup tolerance ratio must be in (0, 0.5), got {0}")]
    InvalidDedupRatio(f64),
}
