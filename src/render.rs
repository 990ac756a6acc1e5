use crate::canvas::{ArcText, Fill, PlainText, Renderer, Stroke, TextOrientation};
use crate::config::RenderConfig;
use crate::ir::FamilyTree;
use crate::layout::{AngleInterval, Chart, LayoutError, Point, draw_chart, draw_labels};
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

/// Lays the chart out (and the labels when a tree is given) into an SVG
/// document.
pub fn render_svg(
    chart: &Chart,
    tree: Option<&FamilyTree>,
    theme: &Theme,
) -> Result<String, LayoutError> {
    let mut svg = SvgRenderer::new(chart.width, chart.height, &theme.background);
    draw_chart(chart, &mut svg)?;
    if let Some(tree) = tree {
        draw_labels(chart, tree, theme, &mut svg)?;
    }
    Ok(svg.finish())
}

/// [`Renderer`] producing a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    width: f64,
    height: f64,
    background: String,
    defs: String,
    body: String,
    next_path_id: usize,
}

impl SvgRenderer {
    pub fn new(width: f64, height: f64, background: &str) -> Self {
        Self {
            width,
            height,
            background: background.to_string(),
            defs: String::new(),
            body: String::new(),
            next_path_id: 0,
        }
    }

    pub fn finish(self) -> String {
        let width = self.width.max(1.0);
        let height = self.height.max(1.0);
        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
        );
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&self.background)
        );
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }

    fn label_path(
        &mut self,
        center: Point,
        radius: f64,
        span: AngleInterval,
        flipped: bool,
    ) -> String {
        let id = format!("label-arc-{}", self.next_path_id);
        self.next_path_id += 1;
        let d = if flipped {
            arc_path(center, radius, span.end, span.start)
        } else {
            arc_path(center, radius, span.start, span.end)
        };
        let _ = write!(self.defs, "<path id=\"{id}\" d=\"{d}\"/>");
        id
    }
}

impl Renderer for SvgRenderer {
    fn draw_arc(&mut self, center: Point, radius: f64, span: AngleInterval, stroke: &Stroke) {
        if span.width().abs() >= 360.0 {
            let _ = write!(
                self.body,
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius:.2}\" fill=\"none\" {}/>",
                center.x,
                center.y,
                stroke_attrs(stroke)
            );
            return;
        }
        let _ = write!(
            self.body,
            "<path d=\"{}\" fill=\"none\" {}/>",
            arc_path(center, radius, span.start, span.end),
            stroke_attrs(stroke)
        );
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let _ = write!(
            self.body,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" {}/>",
            from.x,
            from.y,
            to.x,
            to.y,
            stroke_attrs(stroke)
        );
    }

    fn fill_region(&mut self, boundary: &[Point], fill: &Fill) {
        if boundary.len() < 3 {
            return;
        }
        let _ = write!(
            self.body,
            "<path d=\"{} Z\" fill=\"{}\" fill-opacity=\"{:.3}\" stroke=\"none\"/>",
            points_to_path(boundary),
            escape_xml(&fill.color),
            fill.opacity
        );
    }

    fn draw_text_on_arc(&mut self, text: &ArcText) {
        let mid = text.rotation().rem_euclid(360.0);
        let flipped = mid > 90.0 && mid < 270.0;
        let step = text.font_size * text.line_height;
        let first_offset = (text.lines.len() as f64 - 1.0) / 2.0 * step;
        let half_length = text.radius * text.span.width().abs().to_radians() / 2.0;

        let id = self.label_path(text.center, text.radius, text.span, flipped);
        let _ = write!(
            self.body,
            "<text font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\"><textPath href=\"#{id}\">",
            escape_xml(&text.font_family),
            text.font_size,
            escape_xml(&text.color),
        );
        // dy runs towards the glyph baseline: the first line sits on top as read
        for (idx, line) in text.lines.iter().enumerate() {
            let dy = if idx == 0 { -first_offset } else { step };
            let _ = write!(
                self.body,
                "<tspan x=\"{half_length:.2}\" dy=\"{dy:.2}\">{}</tspan>",
                escape_xml(line)
            );
        }
        self.body.push_str("</textPath></text>");
    }

    fn draw_text(&mut self, text: &PlainText) {
        let Point { x, y } = text.anchor;
        let step = text.font_size * text.line_height;
        let start_y = y - (text.lines.len() as f64 - 1.0) / 2.0 * step;
        let transform = match text.orientation {
            TextOrientation::Horizontal => String::new(),
            TextOrientation::Rotated(angle) => {
                format!(" transform=\"rotate({angle:.2} {x:.2} {y:.2})\"")
            }
        };
        let _ = write!(
            self.body,
            "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\"{transform}>",
            escape_xml(&text.font_family),
            text.font_size,
            escape_xml(&text.color),
        );
        for (idx, line) in text.lines.iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { step };
            let _ = write!(
                self.body,
                "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
                escape_xml(line)
            );
        }
        self.body.push_str("</text>");
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    format!(
        "stroke=\"{}\" stroke-width=\"{:.2}\"",
        escape_xml(&stroke.color),
        stroke.width
    )
}

/// SVG path for the arc from `from` to `to` (degrees clockwise from noon);
/// runs counter-clockwise when `to < from`.
fn arc_path(center: Point, radius: f64, from: f64, to: f64) -> String {
    let start = center.polar(radius, from);
    let end = center.polar(radius, to);
    let large_arc = u8::from((to - from).abs() > 180.0);
    let sweep = u8::from(to > from);
    format!(
        "M {:.2} {:.2} A {radius:.2} {radius:.2} 0 {large_arc} {sweep} {:.2} {:.2}",
        start.x, start.y, end.x, end.y
    )
}

fn points_to_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (idx, point) in points.iter().enumerate() {
        let command = if idx == 0 { "M" } else { " L" };
        let _ = write!(d, "{command} {:.2} {:.2}", point.x, point.y);
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().trim_matches('"').to_string();
    }
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height).ok_or_else(|| {
        anyhow::anyhow!(
            "invalid render size {}x{}",
            render_cfg.width,
            render_cfg.height
        )
    })?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size();
    let scale = (render_cfg.width / size.width()).max(f32::EPSILON);
    let pixmap_width = (size.width() * scale).ceil() as u32;
    let pixmap_height = (size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(pixmap_width, pixmap_height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    tracing::debug!(
        width = pixmap_width,
        height = pixmap_height,
        path = %output.display(),
        "wrote png"
    );
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
