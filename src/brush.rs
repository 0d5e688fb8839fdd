//! # Brush
//!
//! Rendering parameters attached to every finished stroke.

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::BrushError;

/// The stock brush families a stroke can be drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrushFamily {
    /// The current marker.
    Marker,
    /// The first revision of the marker, kept so older data can still be rendered.
    MarkerV1,
    PressurePen,
    Highlighter,
    DashedLine,
    /// A family without a stock name. Identified by an opaque client id.
    Custom(String),
}

impl BrushFamily {
    /// The four families offered in the brush picker.
    pub const STOCK: [BrushFamily; 4] = [
        BrushFamily::PressurePen,
        BrushFamily::Marker,
        BrushFamily::Highlighter,
        BrushFamily::DashedLine,
    ];

    pub fn name(&self) -> &str {
        match self {
            BrushFamily::Marker => "marker",
            BrushFamily::MarkerV1 => "marker-v1",
            BrushFamily::PressurePen => "pressure-pen",
            BrushFamily::Highlighter => "highlighter",
            BrushFamily::DashedLine => "dashed-line",
            BrushFamily::Custom(id) => id,
        }
    }
}

/// Packed 64-bit color.
///
/// sRGB colors store `0xAARRGGBB` in the high 32 bits and a zero color space id in
/// the low 6 bits. Any other color space stores half-float red, green and blue,
/// a 10-bit alpha and the color space id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorLong(pub u64);

impl ColorLong {
    const COLOR_SPACE_MASK: u64 = 0x3f;

    pub const fn from_argb(argb: u32) -> Self {
        Self((argb as u64) << 32)
    }

    pub fn from_color32(color: Color32) -> Self {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        Self::from_argb(u32::from_be_bytes([a, r, g, b]))
    }

    pub fn color_space_id(self) -> u8 {
        (self.0 & Self::COLOR_SPACE_MASK) as u8
    }

    pub fn is_srgb(self) -> bool {
        self.color_space_id() == 0
    }

    /// Unmultiplied sRGB channels, converting out of other color spaces lossily.
    pub fn to_srgba(self) -> [u8; 4] {
        if self.is_srgb() {
            let [a, r, g, b] = ((self.0 >> 32) as u32).to_be_bytes();
            [r, g, b, a]
        } else {
            let channel = |shift: u32| {
                let value = half_to_f32(((self.0 >> shift) & 0xffff) as u16);
                (value.clamp(0.0, 1.0) * 255.0).round() as u8
            };
            let alpha = ((self.0 >> 6) & 0x3ff) as f32 / 1023.0;
            [
                channel(48),
                channel(32),
                channel(16),
                (alpha * 255.0).round() as u8,
            ]
        }
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b, a] = self.to_srgba();
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

/// IEEE 754 binary16 to f32.
fn half_to_f32(bits: u16) -> f32 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = i32::from((bits >> 10) & 0x1f);
    let mantissa = f32::from(bits & 0x3ff);
    match exponent {
        0 => sign * mantissa * 2f32.powi(-24),
        0x1f if mantissa == 0.0 => sign * f32::INFINITY,
        0x1f => f32::NAN,
        _ => sign * (1.0 + mantissa / 1024.0) * 2f32.powi(exponent - 15),
    }
}

/// Family, size, color and smoothing tolerance of a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    family: BrushFamily,
    size: f32,
    color: ColorLong,
    epsilon: f32,
}

impl Brush {
    pub fn new(
        family: BrushFamily,
        color: ColorLong,
        size: f32,
        epsilon: f32,
    ) -> Result<Self, BrushError> {
        validate_size(size)?;
        validate_epsilon(epsilon)?;
        Ok(Self {
            family,
            size,
            color,
            epsilon,
        })
    }

    pub fn with_color32(
        family: BrushFamily,
        color: Color32,
        size: f32,
        epsilon: f32,
    ) -> Result<Self, BrushError> {
        Self::new(family, ColorLong::from_color32(color), size, epsilon)
    }

    pub fn family(&self) -> &BrushFamily {
        &self.family
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> ColorLong {
        self.color
    }

    pub fn color32(&self) -> Color32 {
        self.color.to_color32()
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Copy with another family and size, keeping color and epsilon.
    pub fn with_family(&self, family: BrushFamily, size: f32) -> Result<Self, BrushError> {
        validate_size(size)?;
        Ok(Self {
            family,
            size,
            ..self.clone()
        })
    }

    pub fn with_color(&self, color: Color32) -> Self {
        Self {
            color: ColorLong::from_color32(color),
            ..self.clone()
        }
    }
}

fn validate_size(size: f32) -> Result<(), BrushError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(BrushError::InvalidSize(size))
    }
}

fn validate_epsilon(epsilon: f32) -> Result<(), BrushError> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(BrushError::InvalidEpsilon(epsilon))
    }
}

impl Eq for Brush {}

// Floats are compared and hashed by bit pattern, matching `PartialEq` on the
// byte content of a serialized stroke.
impl std::hash::Hash for Brush {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        state.write_u32(self.size.to_bits());
        self.color.hash(state);
        state.write_u32(self.epsilon.to_bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_color_long_layout() {
        let color = ColorLong::from_color32(Color32::from_rgb(0x12, 0x34, 0x56));
        assert_eq!(color.0, 0xff12_3456_0000_0000);
        assert!(color.is_srgb());
        assert_eq!(color.to_color32(), Color32::from_rgb(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_wide_gamut_color_long_decodes_lossily() {
        // Half-float 1.0 is 0x3c00; alpha 1023 and color space id 7.
        let bits = (0x3c00u64 << 48) | (0x3c00u64 << 16) | (0x3ff << 6) | 7;
        let color = ColorLong(bits);
        assert!(!color.is_srgb());
        assert_eq!(color.to_srgba(), [255, 0, 255, 255]);
    }

    #[test]
    fn test_brush_rejects_bad_parameters() {
        let color = ColorLong::from_color32(Color32::BLACK);
        assert_eq!(
            Brush::new(BrushFamily::Marker, color, 0.0, 0.1),
            Err(BrushError::InvalidSize(0.0))
        );
        assert!(matches!(
            Brush::new(BrushFamily::Marker, color, 5.0, f32::NAN),
            Err(BrushError::InvalidEpsilon(_))
        ));
    }
}
