use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub min_font_size: f64,
    pub line_height: f64,
    pub text_color: String,
    pub line_color: String,
    pub circle_color: String,
    pub marriage_fill: String,
    pub marriage_opacity: f64,
    pub marriage_text_color: String,
    pub background: String,
}

impl Theme {
    /// Black strokes and a translucent yellow marriage band.
    pub fn classic() -> Self {
        Self {
            font_family: "DejaVu Sans, Verdana, sans-serif".to_string(),
            font_size: 14.0,
            min_font_size: 4.0,
            line_height: 1.2,
            text_color: "#000000".to_string(),
            line_color: "#000000".to_string(),
            circle_color: "#000000".to_string(),
            marriage_fill: "#FFFF00".to_string(),
            marriage_opacity: 0.5,
            marriage_text_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            min_font_size: 4.0,
            line_height: 1.25,
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            circle_color: "#7A8AA6".to_string(),
            marriage_fill: "#C7D2E5".to_string(),
            marriage_opacity: 0.6,
            marriage_text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
