//! Editor configuration.
//!
//! Every field has a default, so a host page only needs to supply the values
//! it wants to change, as JSON in a `<script type="application/json"
//! id="artsy-config">` element.
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::scene::Color;

/// Id of the optional JSON config element in the host page
pub const CONFIG_ELEMENT_ID: &str = "artsy-config";

/// Whether exported images keep the background
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportBackground {
    /// Fill colour and background photo are flattened into the export
    #[default]
    Keep,
    /// Fill colour and background photo are left out; uncovered pixels stay transparent
    Transparent,
}

/// Size limits for the drawing surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: f32,
    pub max_height: f32,
    /// Horizontal room taken by page chrome around the canvas
    pub chrome_width: f32,
    /// Vertical room taken by page chrome (toolbar, padding) around the canvas
    pub chrome_height: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            min_width: 400.0,
            min_height: 300.0,
            max_width: 800.0,
            max_height: 600.0,
            chrome_width: 80.0,
            chrome_height: 200.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub color: Color,
    pub width: f32,
    pub min_width: f32,
    pub max_width: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            color: Color::rgb(1.0, 133.0 / 255.0, 161.0 / 255.0),
            width: 6.0,
            min_width: 1.0,
            max_width: 64.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub surface: SurfaceConfig,
    /// Colour the surface is cleared to
    pub background_color: Color,
    /// Fraction of the surface a background photo may fill
    pub background_inset: f32,
    /// Fraction of the fit-to-surface scale applied to new stickers
    pub sticker_footprint: f32,
    pub export_background: ExportBackground,
    /// Exported files are named `<prefix>_<unix millis>.png`
    pub export_prefix: String,
    pub brush: BrushConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceConfig::default(),
            background_color: Color::white(),
            background_inset: 0.9,
            sticker_footprint: 0.4,
            export_background: ExportBackground::Keep,
            export_prefix: "artsy_capture".to_string(),
            brush: BrushConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot drive an editor
    pub fn validate(&self) -> Result<()> {
        let surface = &self.surface;
        check(
            [surface.min_width, surface.min_height].iter().all(|&v| v.is_finite() && v > 0.0),
            "surface minimums must be positive",
        )?;
        check(
            surface.min_width <= surface.max_width && surface.min_height <= surface.max_height,
            "surface minimums must not exceed maximums",
        )?;
        check(
            [surface.max_width, surface.max_height].iter().all(|v| v.is_finite()),
            "surface maximums must be finite",
        )?;
        check(
            [surface.chrome_width, surface.chrome_height]
                .iter()
                .all(|&v| v.is_finite() && v >= 0.0),
            "surface chrome must be zero or more",
        )?;

        let brush = &self.brush;
        check(
            brush.min_width.is_finite() && brush.min_width > 0.0,
            "brush min_width must be positive",
        )?;
        check(
            brush.max_width.is_finite() && brush.min_width <= brush.max_width,
            "brush min_width must not exceed max_width",
        )?;
        check(brush.width.is_finite(), "brush width must be finite")?;

        check(is_fraction(self.background_inset), "background_inset must be in (0, 1]")?;
        check(is_fraction(self.sticker_footprint), "sticker_footprint must be in (0, 1]")?;
        Ok(())
    }

    /// Read the config element from the current document, falling back to
    /// defaults when it is missing or malformed.
    pub fn from_document() -> Self {
        let Some(element) = gloo_utils::document().get_element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        let json = element.text_content().unwrap_or_default();
        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded editor config from #{}", CONFIG_ELEMENT_ID);
                config
            }
            Err(e) => {
                log::warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }
}

fn is_fraction(value: f32) -> bool {
    value > 0.0 && value <= 1.0
}

fn check(ok: bool, message: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(EditorError::Config(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.surface.min_width, 400.0);
        assert_eq!(config.surface.max_height, 600.0);
        assert_eq!(config.background_inset, 0.9);
        assert_eq!(config.sticker_footprint, 0.4);
        assert_eq!(config.export_background, ExportBackground::Keep);
        assert_eq!(config.brush.color.to_hex(), "#ff85a1");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(
            r##"{ "export_background": "transparent", "surface": { "max_width": 640 }, "brush": { "color": "#000000" } }"##,
        )
        .unwrap();
        assert_eq!(config.export_background, ExportBackground::Transparent);
        assert_eq!(config.surface.max_width, 640.0);
        assert_eq!(config.surface.min_width, 400.0);
        assert_eq!(config.brush.color, Color::black());
        assert_eq!(config.brush.width, 6.0);
        assert_eq!(config.export_prefix, "artsy_capture");
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = EditorConfig::from_json("{ \"background_color\": \"teal\" }").unwrap_err();
        assert!(matches!(err, crate::error::EditorError::Config(_)));
    }

    #[test]
    fn test_inverted_brush_bounds_are_rejected() {
        let err = EditorConfig::from_json(r#"{ "brush": { "min_width": 10, "max_width": 5 } }"#)
            .unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        for json in [
            r#"{ "sticker_footprint": 0 }"#,
            r#"{ "background_inset": 1.5 }"#,
            r#"{ "surface": { "min_width": 0, "max_width": 0 } }"#,
            r#"{ "surface": { "min_height": 700 } }"#,
            r#"{ "surface": { "chrome_width": -1 } }"#,
            r#"{ "brush": { "min_width": 0 } }"#,
        ] {
            let err = EditorConfig::from_json(json).unwrap_err();
            assert!(matches!(err, EditorError::Config(_)), "{} gave {:?}", json, err);
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(EditorConfig::default().validate(), Ok(()));
    }
}
