use std::fs;
use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::brush::{Brush, BrushFamily};
use crate::error::ConfigError;
use crate::tool::DEFAULT_ERASER_PADDING;

/// A brush choice offered in the picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushPreset {
    pub family: BrushFamily,
    pub size: f32,
}

impl BrushPreset {
    pub fn new(family: BrushFamily, size: f32) -> Self {
        Self { family, size }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultBrush {
    pub family: BrushFamily,
    pub size: f32,
    pub epsilon: f32,
}

impl Default for DefaultBrush {
    fn default() -> Self {
        Self {
            family: BrushFamily::PressurePen,
            size: 5.0,
            epsilon: 0.1,
        }
    }
}

/// Settings for a drawing session.
///
/// Every field has a default, so a config file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Half-thickness of the eraser's swept region
    pub eraser_padding: f32,
    /// Picks a light default ink so strokes show on a dark canvas
    pub night_mode: bool,
    pub default_brush: DefaultBrush,
    pub brush_presets: Vec<BrushPreset>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            eraser_padding: DEFAULT_ERASER_PADDING,
            night_mode: false,
            default_brush: DefaultBrush::default(),
            brush_presets: vec![
                BrushPreset::new(BrushFamily::PressurePen, 5.0),
                BrushPreset::new(BrushFamily::Marker, 10.0),
                BrushPreset::new(BrushFamily::Highlighter, 25.0),
                BrushPreset::new(BrushFamily::DashedLine, 5.0),
            ],
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Checks every size and epsilon by building the brushes they describe.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let brush = self.default_brush()?;
        for preset in &self.brush_presets {
            brush.with_family(preset.family.clone(), preset.size)?;
        }
        if !(self.eraser_padding.is_finite() && self.eraser_padding >= 0.0) {
            return Err(ConfigError::InvalidPadding(self.eraser_padding));
        }
        Ok(())
    }

    pub fn default_ink_color(&self) -> Color32 {
        if self.night_mode {
            Color32::WHITE
        } else {
            Color32::GRAY
        }
    }

    pub fn default_brush(&self) -> Result<Brush, ConfigError> {
        Ok(Brush::with_color32(
            self.default_brush.family.clone(),
            self.default_ink_color(),
            self.default_brush.size,
            self.default_brush.epsilon,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = SessionConfig::from_json_str(r#"{ "night_mode": true }"#).unwrap();
        assert!(config.night_mode);
        assert_eq!(config.eraser_padding, 50.0);
        assert_eq!(config.brush_presets.len(), 4);

        let brush = config.default_brush().unwrap();
        assert_eq!(brush.family(), &BrushFamily::PressurePen);
        assert_eq!(brush.color32(), Color32::WHITE);
        assert_eq!(brush.size(), 5.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "default_brush": { "size": 0.0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "eraser_padding": -1.0 }"#),
            Err(ConfigError::InvalidPadding(_))
        ));
        assert!(matches!(
            SessionConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
