use crate::canvas::{ArcText, PlainText, Renderer, TextOrientation};
use crate::ir::{FamilyTree, sosa_at};
use crate::theme::Theme;

use super::error::LayoutError;
use super::text::fit_lines;
use super::types::{AngleInterval, GenerationBand};
use super::Chart;

// Share of a band's depth text may occupy.
const DEPTH_FILL: f64 = 0.9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelStats {
    pub placed: usize,
    /// Labels that did not fit their slot even at the minimum font size.
    pub dropped: usize,
    /// People deeper than the chart's last generation.
    pub beyond_chart: usize,
}

/// Places the root in the center circle, every known ancestor in its
/// person slot and every known marriage in its couple slot.
pub fn draw_labels<R: Renderer + ?Sized>(
    chart: &Chart,
    tree: &FamilyTree,
    theme: &Theme,
    renderer: &mut R,
) -> Result<LabelStats, LayoutError> {
    let mut stats = LabelStats::default();

    if let Some(root) = tree.root() {
        let room = 2.0 * chart.base_radius * DEPTH_FILL;
        match fit(&root.label_lines(), room, room, theme.font_size, theme) {
            Some((lines, font_size)) => {
                renderer.draw_text(&PlainText {
                    lines,
                    anchor: chart.center,
                    orientation: TextOrientation::Horizontal,
                    font_size,
                    line_height: theme.line_height,
                    color: theme.text_color.clone(),
                    font_family: theme.font_family.clone(),
                });
                stats.placed += 1;
            }
            None => stats.dropped += 1,
        }
    }

    for n in 1..=chart.generations {
        let band = chart.band(n)?;
        let slots = chart.slots(n);
        for (slot, span) in slots.iter().enumerate() {
            let Some(person) = tree.person(sosa_at(n, slot)) else {
                continue;
            };
            let placed = place_person(chart, &band, *span, &person.label_lines(), theme, renderer);
            if placed {
                stats.placed += 1;
            } else {
                tracing::warn!(
                    sosa = person.sosa,
                    name = %person.name,
                    "label does not fit its slot"
                );
                stats.dropped += 1;
            }
        }

        for (couple, pair) in slots.chunks(2).enumerate() {
            let child = sosa_at(n - 1, couple);
            let Some(label) = tree
                .marriage_of_parents(child)
                .and_then(|event| event.marriage_label())
            else {
                continue;
            };
            let span = AngleInterval::new(pair[0].start, pair[pair.len() - 1].end);
            if place_marriage(chart, &band, span, label, theme, renderer) {
                stats.placed += 1;
            } else {
                tracing::debug!(child, "marriage label does not fit its band");
                stats.dropped += 1;
            }
        }
    }

    stats.beyond_chart = tree
        .people
        .values()
        .filter(|person| person.generation() > chart.generations)
        .count();
    if stats.beyond_chart > 0 {
        tracing::warn!(
            count = stats.beyond_chart,
            generations = chart.generations,
            "ancestors beyond the last generation are not shown"
        );
    }
    Ok(stats)
}

fn place_person<R: Renderer + ?Sized>(
    chart: &Chart,
    band: &GenerationBand,
    span: AngleInterval,
    lines: &[String],
    theme: &Theme,
    renderer: &mut R,
) -> bool {
    let radius = band.person_mid_radius();
    let usable = span.shrink(chart.label_fill_ratio);
    let arc_length = radius * usable.width().to_radians();
    let depth = band.person_depth() * DEPTH_FILL;
    let start = start_font_size(chart, theme, band.generation);

    if arc_length >= chart.radial_text_threshold {
        let Some((lines, font_size)) = fit(lines, arc_length, depth, start, theme) else {
            return false;
        };
        renderer.draw_text_on_arc(&ArcText {
            lines,
            center: chart.center,
            radius,
            span: usable,
            font_size,
            line_height: theme.line_height,
            color: theme.text_color.clone(),
            font_family: theme.font_family.clone(),
        });
        return true;
    }

    // Narrow slots: run the text along the radius instead.
    let Some((lines, font_size)) = fit(lines, depth, arc_length, start, theme) else {
        return false;
    };
    renderer.draw_text(&PlainText {
        lines,
        anchor: chart.point_at(radius, span.mid()),
        orientation: TextOrientation::Rotated(radial_rotation(span.mid())),
        font_size,
        line_height: theme.line_height,
        color: theme.text_color.clone(),
        font_family: theme.font_family.clone(),
    });
    true
}

fn place_marriage<R: Renderer + ?Sized>(
    chart: &Chart,
    band: &GenerationBand,
    span: AngleInterval,
    label: String,
    theme: &Theme,
    renderer: &mut R,
) -> bool {
    let radius = band.marriage_mid_radius();
    let usable = span.shrink(chart.label_fill_ratio);
    let arc_length = radius * usable.width().to_radians();
    let depth = band.marriage_depth() * DEPTH_FILL;
    let start = start_font_size(chart, theme, band.generation);
    let Some((lines, font_size)) = fit(&[label], arc_length, depth, start, theme) else {
        return false;
    };
    renderer.draw_text_on_arc(&ArcText {
        lines,
        center: chart.center,
        radius,
        span: usable,
        font_size,
        line_height: theme.line_height,
        color: theme.marriage_text_color.clone(),
        font_family: theme.font_family.clone(),
    });
    true
}

/// Font size generation `n` starts fitting from: the theme size scaled like
/// the ring's stroke relative to the first ring.
fn start_font_size(chart: &Chart, theme: &Theme, n: usize) -> f64 {
    let first = chart.dimensions.stroke_width(1);
    let ratio = if first > 0.0 {
        chart.dimensions.stroke_width(n) / first
    } else {
        1.0
    };
    (theme.font_size * ratio).max(theme.min_font_size)
}

fn fit(
    lines: &[String],
    max_width: f64,
    max_height: f64,
    start_size: f64,
    theme: &Theme,
) -> Option<(Vec<String>, f64)> {
    fit_lines(
        lines,
        max_width,
        max_height,
        start_size,
        theme.min_font_size,
        theme.line_height,
        &theme.font_family,
    )
}

/// Rotation for text running outwards along the ray at `angle`, flipped on
/// the left half so it never reads upside down.
fn radial_rotation(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    if normalized > 180.0 {
        angle + 90.0
    } else {
        angle - 90.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::ir::{Date, Event, Person};
    use crate::layout_dump::{Primitive, PrimitiveRecorder};

    fn person(sosa: u32, name: &str) -> Person {
        Person {
            sosa,
            name: name.to_string(),
            birth: None,
            death: None,
        }
    }

    fn sample_tree() -> FamilyTree {
        let mut tree = FamilyTree::new();
        tree.insert(person(1, "Root"));
        tree.insert(person(2, "Father"));
        tree.insert(person(3, "Mother"));
        tree.insert(person(5, "Maternal grandfather"));
        tree.insert(person(64, "Too far"));
        tree.marriages.insert(
            2,
            Event {
                date: Some(Date::year(1950)),
                place: Some("Lyon".to_string()),
            },
        );
        tree
    }

    fn chart(generations: usize) -> Chart {
        let config = ChartConfig {
            generations,
            ..ChartConfig::default()
        };
        Chart::new(&config, &Theme::classic()).unwrap()
    }

    #[test]
    fn labels_root_people_and_marriage() {
        let chart = chart(3);
        let mut recorder = PrimitiveRecorder::default();
        let stats = draw_labels(&chart, &sample_tree(), &Theme::classic(), &mut recorder).unwrap();
        assert_eq!(stats.placed + stats.dropped, 5);
        assert_eq!(stats.beyond_chart, 1);

        let texts: Vec<&str> = recorder
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::ArcText(text) => text.lines.first().map(String::as_str),
                Primitive::Text(text) => text.lines.first().map(String::as_str),
                _ => None,
            })
            .collect();
        assert_eq!(texts.first(), Some(&"Root"));
        assert!(texts.contains(&"∞ 1950 Lyon"));
    }

    #[test]
    fn father_sits_left_of_mother() {
        let chart = chart(2);
        let mut recorder = PrimitiveRecorder::default();
        let mut tree = FamilyTree::new();
        tree.insert(person(2, "F"));
        tree.insert(person(3, "M"));
        draw_labels(&chart, &tree, &Theme::classic(), &mut recorder).unwrap();
        let spans: Vec<AngleInterval> = recorder
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::ArcText(text) => Some(text.span),
                _ => None,
            })
            .collect();
        assert_eq!(spans.len(), 2);
        assert!(spans[0].mid() < 0.0);
        assert!(spans[1].mid() > 0.0);
        assert!((spans[0].mid() + 75.0).abs() < 1e-9);
    }

    #[test]
    fn marriage_spans_both_parent_slots() {
        let chart = chart(2);
        let mut recorder = PrimitiveRecorder::default();
        let mut tree = FamilyTree::new();
        tree.marriages.insert(
            4,
            Event {
                date: Some(Date::year(1920)),
                place: None,
            },
        );
        draw_labels(&chart, &tree, &Theme::classic(), &mut recorder).unwrap();
        let [Primitive::ArcText(text)] = recorder.primitives.as_slice() else {
            panic!("expected a single arc label, got {:?}", recorder.primitives);
        };
        // parents of sosa 2 share the left half of generation 2
        assert!((text.span.mid() + 75.0).abs() < 1e-9);
        let band = chart.band(2).unwrap();
        assert!((text.radius - band.marriage_mid_radius()).abs() < 1e-9);
    }

    #[test]
    fn font_size_shrinks_with_outer_strokes() {
        let chart = chart(6);
        let theme = Theme::classic();
        assert_eq!(start_font_size(&chart, &theme, 1), theme.font_size);
        assert!((start_font_size(&chart, &theme, 5) - theme.font_size * 0.65).abs() < 1e-9);
        assert!((start_font_size(&chart, &theme, 6) - theme.font_size * 0.3).abs() < 1e-9);

        // a one-letter name fits easily in both rings, so only the start size differs
        let mut tree = FamilyTree::new();
        tree.insert(person(2, "A"));
        tree.insert(person(16, "B"));
        let mut recorder = PrimitiveRecorder::default();
        draw_labels(&chart, &tree, &theme, &mut recorder).unwrap();
        let sizes: Vec<(String, f64)> = recorder
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::ArcText(text) => Some((text.lines[0].clone(), text.font_size)),
                Primitive::Text(text) => Some((text.lines[0].clone(), text.font_size)),
                _ => None,
            })
            .collect();
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[0], ("A".to_string(), theme.font_size));
        assert_eq!(sizes[1].0, "B");
        assert!(sizes[1].1 < sizes[0].1);
    }

    #[test]
    fn radial_text_reads_outwards() {
        assert_eq!(radial_rotation(30.0), -60.0);
        assert_eq!(radial_rotation(-30.0), 60.0);
    }
}
