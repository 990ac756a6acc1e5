use crate::config::{Config, load_config};
use crate::ir::FamilyTree;
use crate::layout::{Chart, draw_chart, draw_labels};
use crate::layout_dump::{PrimitiveRecorder, primitive_dump_json, write_primitive_dump};
use crate::parser::{parse_family_tree, parse_family_tree_json5};
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fanchart", version, about = "Circular genealogical fan chart renderer")]
pub struct Args {
    /// Family tree file (.json/.json5) or '-' for stdin. Omit for an empty chart.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format; guessed from the output extension when omitted
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Number of ancestor generations
    #[arg(short = 'g', long = "generations")]
    pub generations: Option<usize>,

    /// Half-aperture of the fan, in degrees
    #[arg(short = 'a', long = "aperture")]
    pub aperture: Option<f64>,

    /// Theme name (classic, modern)
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// PNG width (default 1200, or the config file's render.width)
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// PNG height (default 800, or the config file's render.height)
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = resolve_config(&args)?;
    let tree = read_tree(args.input.as_deref())?;
    let chart = Chart::new(&config.chart, &config.theme)?;

    match resolve_format(args.output_format, args.output.as_deref()) {
        OutputFormat::Svg => {
            let svg = render_svg(&chart, tree.as_ref(), &config.theme)?;
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&chart, tree.as_ref(), &config.theme)?;
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
        OutputFormat::Json => {
            let mut recorder = PrimitiveRecorder::default();
            draw_chart(&chart, &mut recorder)?;
            if let Some(tree) = tree.as_ref() {
                draw_labels(&chart, tree, &config.theme, &mut recorder)?;
            }
            match args.output.as_deref() {
                Some(path) => write_primitive_dump(path, &chart, &recorder)?,
                None => println!("{}", primitive_dump_json(&chart, &recorder)?),
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(name) = args.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme '{name}'"))?;
    }
    if let Some(generations) = args.generations {
        config.chart.generations = generations;
    }
    if let Some(aperture) = args.aperture {
        config.chart.aperture = aperture;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    Ok(config)
}

fn read_tree(path: Option<&Path>) -> Result<Option<FamilyTree>> {
    let Some(path) = path else {
        return Ok(None);
    };
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Some(parse_family_tree(&buf)?));
    }
    let content = std::fs::read_to_string(path)?;
    let tree = if has_extension(path, &["json5"]) {
        parse_family_tree_json5(&content)?
    } else {
        parse_family_tree(&content)?
    };
    Ok(Some(tree))
}

fn resolve_format(explicit: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
    if let Some(format) = explicit {
        return format;
    }
    match output {
        Some(path) if has_extension(path, &["png"]) => OutputFormat::Png,
        Some(path) if has_extension(path, &["json"]) => OutputFormat::Json,
        _ => OutputFormat::Svg,
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
        .unwrap_or(false)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension_unless_explicit() {
        assert_eq!(resolve_format(None, None), OutputFormat::Svg);
        assert_eq!(
            resolve_format(None, Some(Path::new("chart.PNG"))),
            OutputFormat::Png
        );
        assert_eq!(
            resolve_format(None, Some(Path::new("chart.json"))),
            OutputFormat::Json
        );
        assert_eq!(
            resolve_format(Some(OutputFormat::Svg), Some(Path::new("chart.png"))),
            OutputFormat::Svg
        );
    }

    #[test]
    fn command_line_overrides_config() {
        let args = Args::parse_from([
            "fanchart", "-g", "4", "-a", "120", "-t", "modern", "-w", "600",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.chart.generations, 4);
        assert_eq!(config.chart.aperture, 120.0);
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
        assert_eq!(config.render.width, 600.0);
        assert_eq!(config.render.height, 800.0);
    }

    #[test]
    fn config_file_size_survives_without_flags() {
        let path = std::env::temp_dir().join(format!("fanchart-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"render": {"width": 640, "height": 480}}"#).unwrap();
        let config_arg = path.to_string_lossy().into_owned();
        let args = Args::parse_from(["fanchart", "-c", config_arg.as_str(), "-H", "300"]);
        let config = resolve_config(&args);
        std::fs::remove_file(&path).ok();
        let config = config.unwrap();
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.height, 300.0);
    }

    #[test]
    fn png_needs_output_path() {
        assert!(ensure_output(&None, "png").is_err());
    }
}
