use serde::Serialize;

/// Screen coordinates (SVG convention, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self`, `angle` degrees clockwise from noon.
    pub fn polar(self, radius: f64, angle: f64) -> Self {
        let rad = angle.to_radians();
        Self {
            x: self.x + radius * rad.sin(),
            y: self.y - radius * rad.cos(),
        }
    }
}

/// One angular slot, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleInterval {
    pub start: f64,
    pub end: f64,
}

impl AngleInterval {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Same midpoint, width scaled by `factor`.
    pub fn shrink(&self, factor: f64) -> Self {
        let half = self.width() * factor / 2.0;
        let mid = self.mid();
        Self::new(mid - half, mid + half)
    }

    pub fn rotate(&self, by: f64) -> Self {
        Self::new(self.start + by, self.end + by)
    }
}

impl From<(f64, f64)> for AngleInterval {
    fn from((start, end): (f64, f64)) -> Self {
        Self::new(start, end)
    }
}

/// Radii of one generation ring. `inner_radius` is the previous
/// generation's outer radius; the marriage band sits between it and
/// `marriage_radius`, the person band between `marriage_radius` and
/// `outer_radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationBand {
    pub generation: usize,
    pub inner_radius: f64,
    pub marriage_radius: f64,
    pub outer_radius: f64,
}

impl GenerationBand {
    pub fn person_mid_radius(&self) -> f64 {
        (self.marriage_radius + self.outer_radius) / 2.0
    }

    pub fn marriage_mid_radius(&self) -> f64 {
        (self.inner_radius + self.marriage_radius) / 2.0
    }

    pub fn person_depth(&self) -> f64 {
        self.outer_radius - self.marriage_radius
    }

    pub fn marriage_depth(&self) -> f64 {
        self.marriage_radius - self.inner_radius
    }
}

/// Smallest axis-aligned box around the fan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
