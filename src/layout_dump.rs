use crate::canvas::{ArcText, Fill, PlainText, Renderer, Stroke};
use crate::layout::{AngleInterval, Chart, Point};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Arc {
        center: Point,
        radius: f64,
        span: AngleInterval,
        stroke: Stroke,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Fill {
        points: Vec<Point>,
        fill: Fill,
    },
    ArcText(ArcText),
    Text(PlainText),
}

/// Renderer that keeps every primitive in call order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrimitiveRecorder {
    pub primitives: Vec<Primitive>,
}

impl Renderer for PrimitiveRecorder {
    fn draw_arc(&mut self, center: Point, radius: f64, span: AngleInterval, stroke: &Stroke) {
        self.primitives.push(Primitive::Arc {
            center,
            radius,
            span,
            stroke: stroke.clone(),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.primitives.push(Primitive::Line {
            from,
            to,
            stroke: stroke.clone(),
        });
    }

    fn fill_region(&mut self, boundary: &[Point], fill: &Fill) {
        self.primitives.push(Primitive::Fill {
            points: boundary.to_vec(),
            fill: fill.clone(),
        });
    }

    fn draw_text_on_arc(&mut self, text: &ArcText) {
        self.primitives.push(Primitive::ArcText(text.clone()));
    }

    fn draw_text(&mut self, text: &PlainText) {
        self.primitives.push(Primitive::Text(text.clone()));
    }
}

#[derive(Debug, Serialize)]
pub struct PrimitiveDump<'a> {
    pub width: f64,
    pub height: f64,
    pub center: Point,
    pub max_radius: f64,
    pub primitives: &'a [Primitive],
}

impl<'a> PrimitiveDump<'a> {
    pub fn new(chart: &Chart, recorder: &'a PrimitiveRecorder) -> Self {
        Self {
            width: chart.width,
            height: chart.height,
            center: chart.center,
            max_radius: chart.max_radius(),
            primitives: &recorder.primitives,
        }
    }
}

pub fn primitive_dump_json(chart: &Chart, recorder: &PrimitiveRecorder) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&PrimitiveDump::new(chart, recorder))?)
}

pub fn write_primitive_dump(
    path: &Path,
    chart: &Chart,
    recorder: &PrimitiveRecorder,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &PrimitiveDump::new(chart, recorder))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::layout::draw_chart;
    use crate::theme::Theme;

    #[test]
    fn dump_is_tagged_json() {
        let config = ChartConfig {
            generations: 2,
            ..ChartConfig::default()
        };
        let chart = Chart::new(&config, &Theme::classic()).unwrap();
        let mut recorder = PrimitiveRecorder::default();
        draw_chart(&chart, &mut recorder).unwrap();
        let json = primitive_dump_json(&chart, &recorder).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let primitives = value["primitives"].as_array().unwrap();
        assert_eq!(primitives.len(), recorder.primitives.len());
        assert_eq!(primitives[0]["kind"], "arc");
        assert_eq!(primitives[1]["kind"], "line");
        assert!(value["max_radius"].as_f64().unwrap() > 0.0);
    }
}
