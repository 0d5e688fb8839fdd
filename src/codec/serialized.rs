use serde::{Deserialize, Serialize};

use crate::brush::{Brush, BrushFamily, ColorLong};
use crate::error::CodecError;

/// One stroke as stored: the binary input payload plus its brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedStroke {
    #[serde(with = "signed_bytes")]
    pub inputs: Vec<u8>,
    pub brush: SerializedBrush,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedBrush {
    pub size: f32,
    /// The packed color long reinterpreted as signed.
    pub color: i64,
    pub epsilon: f32,
    #[serde(rename = "stockBrush", default)]
    pub stock_brush: Option<SerializedStockBrush>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SerializedStockBrush {
    MarkerLatest,
    PressurePenLatest,
    HighlighterLatest,
    DashedLineLatest,
    /// Any tag this version does not know.
    #[serde(other)]
    Unrecognized,
}

impl SerializedStockBrush {
    /// Families without a stock tag are stored as the current marker.
    pub fn from_family(family: &BrushFamily) -> Self {
        match family {
            BrushFamily::Marker => Self::MarkerLatest,
            BrushFamily::PressurePen => Self::PressurePenLatest,
            BrushFamily::Highlighter => Self::HighlighterLatest,
            BrushFamily::DashedLine => Self::DashedLineLatest,
            BrushFamily::MarkerV1 | BrushFamily::Custom(_) => {
                log::debug!("No stock tag for brush family {}, storing as marker", family.name());
                Self::MarkerLatest
            }
        }
    }

    /// Missing or unrecognized tags load as the legacy marker.
    pub fn to_family(tag: Option<Self>) -> BrushFamily {
        match tag {
            Some(Self::MarkerLatest) => BrushFamily::Marker,
            Some(Self::PressurePenLatest) => BrushFamily::PressurePen,
            Some(Self::HighlighterLatest) => BrushFamily::Highlighter,
            Some(Self::DashedLineLatest) => BrushFamily::DashedLine,
            Some(Self::Unrecognized) | None => BrushFamily::MarkerV1,
        }
    }
}

impl From<&Brush> for SerializedBrush {
    fn from(brush: &Brush) -> Self {
        Self {
            size: brush.size(),
            color: brush.color().0 as i64,
            epsilon: brush.epsilon(),
            stock_brush: Some(SerializedStockBrush::from_family(brush.family())),
        }
    }
}

impl TryFrom<&SerializedBrush> for Brush {
    type Error = CodecError;

    fn try_from(serialized: &SerializedBrush) -> Result<Self, Self::Error> {
        Ok(Brush::new(
            SerializedStockBrush::to_family(serialized.stock_brush),
            ColorLong(serialized.color as u64),
            serialized.size,
            serialized.epsilon,
        )?)
    }
}

/// Byte arrays as JSON arrays of signed bytes. Unsigned values are accepted on read.
mod signed_bytes {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::error::CodecError;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(bytes.iter().map(|&byte| byte as i8))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let values = Vec::<i64>::deserialize(deserializer)?;
        values
            .into_iter()
            .map(|value| match value {
                -128..=-1 => Ok(value as i8 as u8),
                0..=255 => Ok(value as u8),
                _ => Err(D::Error::custom(CodecError::ByteOutOfRange(value))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_are_signed_in_json() {
        let stroke = SerializedStroke {
            inputs: vec![0, 127, 128, 255],
            brush: SerializedBrush {
                size: 5.0,
                color: -1,
                epsilon: 0.1,
                stock_brush: Some(SerializedStockBrush::PressurePenLatest),
            },
        };
        let json = serde_json::to_string(&stroke).unwrap();
        assert!(json.contains("\"inputs\":[0,127,-128,-1]"));
        assert!(json.contains("\"stockBrush\":\"PRESSURE_PEN_LATEST\""));

        let decoded: SerializedStroke = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, stroke);
    }

    #[test]
    fn test_unsigned_bytes_accepted_and_out_of_range_rejected() {
        let json = r#"{"inputs":[200,-56],"brush":{"size":1.0,"color":0,"epsilon":0.1}}"#;
        let decoded: SerializedStroke = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.inputs, vec![200, 200]);
        assert_eq!(decoded.brush.stock_brush, None);

        let json = r#"{"inputs":[256],"brush":{"size":1.0,"color":0,"epsilon":0.1}}"#;
        assert!(serde_json::from_str::<SerializedStroke>(json).is_err());
    }

    #[test]
    fn test_unknown_tag_parses_as_unrecognized() {
        let brush: SerializedBrush = serde_json::from_str(
            r#"{"size":1.0,"color":0,"epsilon":0.1,"stockBrush":"CALLIGRAPHY_LATEST"}"#,
        )
        .unwrap();
        assert_eq!(brush.stock_brush, Some(SerializedStockBrush::Unrecognized));
        assert_eq!(SerializedStockBrush::to_family(brush.stock_brush), BrushFamily::MarkerV1);
    }
}
