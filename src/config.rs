use crate::layout::Dimension;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Number of ancestor generations around the center circle.
    pub generations: usize,
    /// Half of the angular span, in degrees, each side of noon.
    pub aperture: f64,
    /// Whole-chart rotation, degrees clockwise.
    pub rotation: f64,
    pub base_radius: f64,
    pub people: Vec<Dimension>,
    pub marriage: Vec<Dimension>,
    pub stroke: Vec<Dimension>,
    pub dedup_tolerance_ratio: f64,
    pub arc_samples: usize,
    pub margin: f64,
    /// Share of a slot's angular width usable by its label.
    pub label_fill_ratio: f64,
    /// Slots whose mid-radius arc is shorter than this get radial text.
    pub radial_text_threshold: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            generations: 6,
            aperture: 150.0,
            rotation: 0.0,
            base_radius: 30.0,
            people: vec![
                Dimension::new(1.5, 3),
                Dimension::new(2.5, 2),
                Dimension::new(5.0, 4),
            ],
            marriage: vec![Dimension::new(0.5, 9)],
            stroke: vec![
                Dimension::new(1.0, 3),
                Dimension::new(0.65, 2),
                Dimension::new(0.3, 4),
            ],
            dedup_tolerance_ratio: 0.1,
            arc_samples: 180,
            margin: 20.0,
            label_fill_ratio: 0.9,
            radial_text_threshold: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub chart: ChartConfig,
    pub theme: Theme,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f64>,
    min_font_size: Option<f64>,
    line_height: Option<f64>,
    text_color: Option<String>,
    line_color: Option<String>,
    circle_color: Option<String>,
    marriage_fill: Option<String>,
    marriage_opacity: Option<f64>,
    marriage_text_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ChartConfigFile {
    generations: Option<usize>,
    aperture: Option<f64>,
    rotation: Option<f64>,
    base_radius: Option<f64>,
    people: Option<Vec<Dimension>>,
    marriage: Option<Vec<Dimension>>,
    stroke: Option<Vec<Dimension>>,
    dedup_tolerance_ratio: Option<f64>,
    arc_samples: Option<usize>,
    margin: Option<f64>,
    label_fill_ratio: Option<f64>,
    radial_text_threshold: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    chart: Option<ChartConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    if is_json5 {
        parse_config_json5(&contents)
    } else {
        parse_config(&contents)
    }
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    apply_config_file(parsed)
}

pub fn parse_config_json5(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    apply_config_file(parsed)
}

fn apply_config_file(parsed: ConfigFile) -> anyhow::Result<Config> {
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme '{theme_name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.min_font_size {
            config.theme.min_font_size = v;
        }
        if let Some(v) = vars.line_height {
            config.theme.line_height = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.circle_color {
            config.theme.circle_color = v;
        }
        if let Some(v) = vars.marriage_fill {
            config.theme.marriage_fill = v;
        }
        if let Some(v) = vars.marriage_opacity {
            config.theme.marriage_opacity = v;
        }
        if let Some(v) = vars.marriage_text_color {
            config.theme.marriage_text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(chart) = parsed.chart {
        let target = &mut config.chart;
        if let Some(v) = chart.generations {
            target.generations = v;
        }
        if let Some(v) = chart.aperture {
            target.aperture = v;
        }
        if let Some(v) = chart.rotation {
            target.rotation = v;
        }
        if let Some(v) = chart.base_radius {
            target.base_radius = v;
        }
        if let Some(v) = chart.people {
            target.people = v;
        }
        if let Some(v) = chart.marriage {
            target.marriage = v;
        }
        if let Some(v) = chart.stroke {
            target.stroke = v;
        }
        if let Some(v) = chart.dedup_tolerance_ratio {
            target.dedup_tolerance_ratio = v;
        }
        if let Some(v) = chart.arc_samples {
            target.arc_samples = v.max(2);
        }
        if let Some(v) = chart.margin {
            target.margin = v;
        }
        if let Some(v) = chart.label_fill_ratio {
            target.label_fill_ratio = v.clamp(0.0, 1.0);
        }
        if let Some(v) = chart.radial_text_threshold {
            target.radial_text_threshold = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.chart.generations, 6);
        assert_eq!(config.chart.aperture, 150.0);
        assert_eq!(config.theme.marriage_opacity, 0.5);
    }

    #[test]
    fn overrides_chart_and_theme() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "lineColor": "#112233", "fontSize": 10 },
                "chart": {
                    "generations": 3,
                    "aperture": 120,
                    "people": [{ "value": 2.0, "occurrences": 3 }],
                    "dedupToleranceRatio": 0.05
                }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.line_color, "#112233");
        assert_eq!(config.theme.font_size, 10.0);
        assert_eq!(config.chart.generations, 3);
        assert_eq!(config.chart.aperture, 120.0);
        assert_eq!(config.chart.people, vec![Dimension::new(2.0, 3)]);
        assert_eq!(config.chart.dedup_tolerance_ratio, 0.05);
        assert_eq!(config.chart.marriage, ChartConfig::default().marriage);
    }

    #[test]
    fn json5_allows_comments() {
        let config = parse_config_json5(
            "{\n  // fewer rings\n  chart: { generations: 4, },\n}",
        )
        .unwrap();
        assert_eq!(config.chart.generations, 4);
    }

    #[test]
    fn render_block_sets_png_size() {
        let config = parse_config(r#"{"render": {"width": 640, "height": 480}}"#).unwrap();
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.height, 480.0);
    }

    #[test]
    fn unknown_theme_is_an_error() {
        assert!(parse_config(r#"{"theme": "neon"}"#).is_err());
    }
}
