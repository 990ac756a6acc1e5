pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ChartConfig, Config, RenderConfig};
pub use ir::FamilyTree;
pub use layout::{Chart, draw_chart, draw_labels};
pub use parser::parse_family_tree;
pub use render::render_svg;
pub use theme::Theme;

/// Everything needed to turn a family tree into an SVG string.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub chart: ChartConfig,
    pub theme: Theme,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self {
            chart: ChartConfig::default(),
            theme: Theme::classic(),
        }
    }

    pub fn modern() -> Self {
        Self {
            chart: ChartConfig::default(),
            theme: Theme::modern(),
        }
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.chart.generations = generations;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// Parses a JSON family tree and renders it. An empty (or whitespace-only)
/// source renders the bare chart.
pub fn render_with_options(tree_source: &str, options: RenderOptions) -> anyhow::Result<String> {
    let tree = if tree_source.trim().is_empty() {
        None
    } else {
        Some(parse_family_tree(tree_source)?)
    };
    let chart = Chart::new(&options.chart, &options.theme)?;
    Ok(render_svg(&chart, tree.as_ref(), &options.theme)?)
}
