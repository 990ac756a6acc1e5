use fanchart_rs::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FanChartOptions {
    theme: Option<String>,
    generations: Option<usize>,
    aperture: Option<f64>,
    font_family: Option<String>,
    font_size: Option<f64>,
}

fn build_render_options(options: FanChartOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(generations) = options.generations {
        render_options.chart.generations = generations;
    }
    if let Some(aperture) = options.aperture {
        render_options.chart.aperture = aperture;
    }
    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }

    render_options
}

/// Renders a JSON or JSON5 family tree (empty string for a blank chart) to SVG.
#[wasm_bindgen]
pub fn render_fan_chart_svg(
    tree_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FanChartOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        FanChartOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(tree_json, render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
