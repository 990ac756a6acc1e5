mod angles;
mod dimensions;
mod error;
mod labels;
mod radius;
mod text;
pub(crate) mod types;

pub use angles::{
    PlottedAngleSet, dedup_tolerance, generation_angles, generation_boundaries, separating_angles,
};
pub use dimensions::{Dimension, DimensionTable};
pub use error::LayoutError;
pub use labels::{LabelStats, draw_labels};
pub use radius::{radius_marriage, radius_people};
pub use types::*;

use crate::canvas::{Fill, Renderer, Stroke};
use crate::config::ChartConfig;
use crate::theme::Theme;

/// Deepest chart supported; Sosa numbers of the last ring must fit a `u32`.
pub const MAX_GENERATIONS: usize = 31;

/// Validated chart geometry: configuration resolved against a theme, with
/// the canvas size and center derived from the fan's bounding box.
#[derive(Debug, Clone)]
pub struct Chart {
    pub generations: usize,
    pub aperture: f64,
    pub rotation: f64,
    pub base_radius: f64,
    pub dimensions: DimensionTable,
    pub dedup_tolerance_ratio: f64,
    pub arc_samples: usize,
    pub label_fill_ratio: f64,
    pub radial_text_threshold: f64,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub line_color: String,
    pub circle_color: String,
    pub marriage_fill: Fill,
}

impl Chart {
    pub fn new(config: &ChartConfig, theme: &Theme) -> Result<Self, LayoutError> {
        if config.generations == 0 {
            return Err(LayoutError::NoGenerations);
        }
        if config.generations > MAX_GENERATIONS {
            return Err(LayoutError::TooManyGenerations {
                requested: config.generations,
                max: MAX_GENERATIONS,
            });
        }
        if !(config.aperture > 0.0 && config.aperture <= 180.0) {
            return Err(LayoutError::InvalidAperture(config.aperture));
        }
        if !config.rotation.is_finite() {
            return Err(LayoutError::InvalidRotation(config.rotation));
        }
        if !(config.dedup_tolerance_ratio > 0.0 && config.dedup_tolerance_ratio < 0.5) {
            return Err(LayoutError::InvalidDedupRatio(config.dedup_tolerance_ratio));
        }
        let dimensions = DimensionTable::expand(
            &config.people,
            &config.marriage,
            &config.stroke,
            config.generations,
        )?;
        let max_radius = dimensions.radius_people(config.base_radius, config.generations);
        let bounds = fan_bounds(config.base_radius, max_radius, config.aperture, config.rotation);
        let margin = config.margin.max(0.0);

        Ok(Self {
            generations: config.generations,
            aperture: config.aperture,
            rotation: config.rotation,
            base_radius: config.base_radius,
            dimensions,
            dedup_tolerance_ratio: config.dedup_tolerance_ratio,
            arc_samples: config.arc_samples.max(2),
            label_fill_ratio: config.label_fill_ratio,
            radial_text_threshold: config.radial_text_threshold,
            center: Point::new(margin - bounds.min_x, margin - bounds.min_y),
            width: bounds.width() + 2.0 * margin,
            height: bounds.height() + 2.0 * margin,
            line_color: theme.line_color.clone(),
            circle_color: theme.circle_color.clone(),
            marriage_fill: Fill {
                color: theme.marriage_fill.clone(),
                opacity: theme.marriage_opacity,
            },
        })
    }

    pub fn max_radius(&self) -> f64 {
        self.dimensions.radius_people(self.base_radius, self.generations)
    }

    pub fn band(&self, n: usize) -> Result<GenerationBand, LayoutError> {
        self.dimensions.band(self.base_radius, n)
    }

    /// Whole angular span of the fan.
    pub fn span(&self) -> AngleInterval {
        AngleInterval::new(self.rotation - self.aperture, self.rotation + self.aperture)
    }

    /// The `2^n` person slots of generation `n`.
    pub fn slots(&self, n: usize) -> Vec<AngleInterval> {
        generation_angles(self.aperture, n, self.rotation)
    }

    pub fn point_at(&self, radius: f64, angle: f64) -> Point {
        self.center.polar(radius, angle)
    }
}

/// Draws rings, marriage bands and slot separators; returns the outer
/// radius of the last generation.
pub fn draw_chart<R: Renderer + ?Sized>(
    chart: &Chart,
    renderer: &mut R,
) -> Result<f64, LayoutError> {
    let max_radius = chart.max_radius();
    let base_stroke = Stroke::new(chart.circle_color.as_str(), chart.dimensions.stroke_width(1));
    tracing::debug!(
        generations = chart.generations,
        aperture = chart.aperture,
        max_radius,
        "drawing chart"
    );

    renderer.draw_arc(
        chart.center,
        chart.base_radius,
        AngleInterval::new(-180.0, 180.0),
        &base_stroke,
    );

    let side_stroke = Stroke::new(chart.line_color.as_str(), chart.dimensions.stroke_width(1));
    let span = chart.span();
    for angle in [span.start, span.end] {
        renderer.draw_line(
            chart.point_at(chart.base_radius, angle),
            chart.point_at(max_radius, angle),
            &side_stroke,
        );
    }

    draw_generation(chart, renderer, 1, chart.base_radius, PlottedAngleSet::new())
}

fn draw_generation<R: Renderer + ?Sized>(
    chart: &Chart,
    renderer: &mut R,
    n: usize,
    offset: f64,
    mut plotted: PlottedAngleSet,
) -> Result<f64, LayoutError> {
    if n > chart.generations {
        return Ok(offset);
    }

    let dims = &chart.dimensions;
    let marriage_radius = radius_marriage(&dims.people, &dims.marriage, chart.base_radius, n)?;
    let outer_radius = radius_people(&dims.people, &dims.marriage, chart.base_radius, n);
    let stroke = Stroke::new(chart.line_color.as_str(), dims.stroke_width(n));
    let span = chart.span();

    renderer.draw_arc(chart.center, marriage_radius, span, &stroke);
    renderer.draw_arc(chart.center, outer_radius, span, &stroke);

    let band = annular_sector(chart.center, offset, marriage_radius, span, chart.arc_samples);
    renderer.fill_region(&band, &chart.marriage_fill);

    let boundaries = separating_angles(chart.aperture, n, chart.rotation);
    let tolerance = dedup_tolerance(&boundaries, chart.aperture, chart.dedup_tolerance_ratio);
    let fresh = plotted.filter_new(&boundaries, tolerance);
    let max_radius = chart.max_radius();
    for theta in &fresh {
        renderer.draw_line(
            chart.point_at(marriage_radius, *theta),
            chart.point_at(max_radius, *theta),
            &stroke,
        );
    }
    tracing::debug!(
        generation = n,
        inner = offset,
        marriage = marriage_radius,
        outer = outer_radius,
        drawn = fresh.len(),
        skipped = boundaries.len() - fresh.len(),
        "generation laid out"
    );

    plotted.merge(&fresh);
    draw_generation(chart, renderer, n + 1, outer_radius, plotted)
}

/// Closed outline of the ring sector between `inner` and `outer` over
/// `span`: the outer arc forwards, then the inner arc backwards.
pub fn annular_sector(
    center: Point,
    inner: f64,
    outer: f64,
    span: AngleInterval,
    samples: usize,
) -> Vec<Point> {
    let samples = samples.max(2);
    let step = span.width() / (samples - 1) as f64;
    let angle = |i: usize| span.start + i as f64 * step;
    let mut points: Vec<Point> = (0..samples).map(|i| center.polar(outer, angle(i))).collect();
    points.extend((0..samples).rev().map(|i| center.polar(inner, angle(i))));
    points
}

/// Bounding box of the fan relative to its center: the base circle plus
/// the ring sector out to `max_radius`.
pub fn fan_bounds(base_radius: f64, max_radius: f64, aperture: f64, rotation: f64) -> Bounds {
    let origin = Point::new(0.0, 0.0);
    let mut points = vec![
        origin.polar(base_radius, 0.0),
        origin.polar(base_radius, 90.0),
        origin.polar(base_radius, 180.0),
        origin.polar(base_radius, 270.0),
    ];
    let start = rotation - aperture;
    let end = rotation + aperture;
    points.push(origin.polar(max_radius, start));
    points.push(origin.polar(max_radius, end));
    let first_quadrant = (start / 90.0).ceil() as i64;
    let last_quadrant = (end / 90.0).floor() as i64;
    for quadrant in first_quadrant..=last_quadrant {
        points.push(origin.polar(max_radius, quadrant as f64 * 90.0));
    }

    let mut bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for point in points {
        bounds.min_x = bounds.min_x.min(point.x);
        bounds.min_y = bounds.min_y.min(point.y);
        bounds.max_x = bounds.max_x.max(point.x);
        bounds.max_y = bounds.max_y.max(point.y);
    }
    bounds
}
