//! Size value codec for `capacity` and `allocation` fields.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::xml::{XmlNode, XmlValue};

/// Unit suffixes accepted for volume sizes.
///
/// Tokens are matched case-sensitively; a missing unit means libvirt's
/// implicit default (bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeUnit {
    B,
    K,
    KB,
    KiB,
    M,
    MB,
    MiB,
    G,
    GB,
    GiB,
    T,
    TB,
    TiB,
    P,
    PB,
    PiB,
    E,
    EB,
    EiB,
}

impl SizeUnit {
    /// Get the libvirt unit token.
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeUnit::B => "B",
            SizeUnit::K => "K",
            SizeUnit::KB => "KB",
            SizeUnit::KiB => "KiB",
            SizeUnit::M => "M",
            SizeUnit::MB => "MB",
            SizeUnit::MiB => "MiB",
            SizeUnit::G => "G",
            SizeUnit::GB => "GB",
            SizeUnit::GiB => "GiB",
            SizeUnit::T => "T",
            SizeUnit::TB => "TB",
            SizeUnit::TiB => "TiB",
            SizeUnit::P => "P",
            SizeUnit::PB => "PB",
            SizeUnit::PiB => "PiB",
            SizeUnit::E => "E",
            SizeUnit::EB => "EB",
            SizeUnit::EiB => "EiB",
        }
    }

    /// Match a token against the unit vocabulary, case-sensitively.
    pub fn parse(token: &str) -> Option<SizeUnit> {
        match token {
            "B" => Some(SizeUnit::B),
            "K" => Some(SizeUnit::K),
            "KB" => Some(SizeUnit::KB),
            "KiB" => Some(SizeUnit::KiB),
            "M" => Some(SizeUnit::M),
            "MB" => Some(SizeUnit::MB),
            "MiB" => Some(SizeUnit::MiB),
            "G" => Some(SizeUnit::G),
            "GB" => Some(SizeUnit::GB),
            "GiB" => Some(SizeUnit::GiB),
            "T" => Some(SizeUnit::T),
            "TB" => Some(SizeUnit::TB),
            "TiB" => Some(SizeUnit::TiB),
            "P" => Some(SizeUnit::P),
            "PB" => Some(SizeUnit::PB),
            "PiB" => Some(SizeUnit::PiB),
            "E" => Some(SizeUnit::E),
            "EB" => Some(SizeUnit::EB),
            "EiB" => Some(SizeUnit::EiB),
            _ => None,
        }
    }
}

/// A capacity or allocation figure: integer magnitude plus optional unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeValue {
    /// Magnitude, always stored as an integer.
    pub magnitude: u64,
    /// Unit suffix; emitted only when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<SizeUnit>,
}

impl SizeValue {
    /// A size in libvirt's implicit default unit.
    pub fn new(magnitude: u64) -> Self {
        Self {
            magnitude,
            unit: None,
        }
    }

    /// A size with an explicit unit suffix.
    pub fn with_unit(magnitude: u64, unit: SizeUnit) -> Self {
        Self {
            magnitude,
            unit: Some(unit),
        }
    }

    /// Validate a decoded field value.
    ///
    /// Accepted shapes: an integer scalar, numeric text, or an element
    /// node whose text is the magnitude with an optional `unit` attribute.
    pub fn from_xml(value: &XmlValue) -> Result<Self, SchemaError> {
        match value {
            XmlValue::Number(number) => Ok(Self::new(*number)),
            XmlValue::Text(text) => Ok(Self::new(parse_magnitude(text, value)?)),
            XmlValue::Node(node) => {
                let text = node.text().unwrap_or("");
                let magnitude = parse_magnitude(text, value)?;
                let unit = match node.attr("unit") {
                    Some(token) => Some(
                        SizeUnit::parse(token).ok_or_else(|| SchemaError::new("unit", token))?,
                    ),
                    None => None,
                };
                Ok(Self { magnitude, unit })
            }
        }
    }

    pub(crate) fn to_xml(&self) -> XmlValue {
        match self.unit {
            Some(unit) => XmlValue::Node(
                XmlNode::new()
                    .with_attribute("unit", unit.as_str())
                    .with_text(self.magnitude.to_string()),
            ),
            None => XmlValue::Text(self.magnitude.to_string()),
        }
    }
}

/// Whole non-negative decimal integers only; "10.5" is rejected rather
/// than truncated.
fn parse_magnitude(text: &str, value: &XmlValue) -> Result<u64, SchemaError> {
    text.trim()
        .parse::<u64>()
        .map_err(|_| SchemaError::new("value", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_input() {
        let size = SizeValue::from_xml(&XmlValue::Number(1024)).unwrap();
        assert_eq!(size, SizeValue::new(1024));
    }

    #[test]
    fn test_numeric_text_input() {
        let size = SizeValue::from_xml(&XmlValue::from("10")).unwrap();
        assert_eq!(size.magnitude, 10);
        assert_eq!(size.unit, None);
    }

    #[test]
    fn test_node_with_unit() {
        let node = XmlNode::new().with_attribute("unit", "GiB").with_text("10");
        let size = SizeValue::from_xml(&XmlValue::Node(node)).unwrap();
        assert_eq!(size, SizeValue::with_unit(10, SizeUnit::GiB));
    }

    #[test]
    fn test_node_without_unit() {
        let node = XmlNode::new()
            .with_attribute("other", "x")
            .with_text("2048");
        let size = SizeValue::from_xml(&XmlValue::Node(node)).unwrap();
        assert_eq!(size.magnitude, 2048);
        assert_eq!(size.unit, None);
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let node = XmlNode::new().with_attribute("unit", "XX").with_text("10");
        let err = SizeValue::from_xml(&XmlValue::Node(node)).unwrap_err();
        assert_eq!(err.field(), "unit");
        assert_eq!(err.value(), "XX");
    }

    #[test]
    fn test_unit_match_is_case_sensitive() {
        let node = XmlNode::new().with_attribute("unit", "gib").with_text("10");
        assert!(SizeValue::from_xml(&XmlValue::Node(node)).is_err());
    }

    #[test]
    fn test_non_integer_text_rejected() {
        for bad in ["abc", "10.5", "-3", ""] {
            let err = SizeValue::from_xml(&XmlValue::from(bad)).unwrap_err();
            assert_eq!(err.field(), "value", "input {:?}", bad);
        }
    }

    #[test]
    fn test_node_without_text_rejected() {
        let node = XmlNode::new().with_attribute("unit", "GiB");
        assert!(SizeValue::from_xml(&XmlValue::Node(node)).is_err());
    }

    #[test]
    fn test_to_xml_shapes() {
        assert_eq!(
            SizeValue::new(10).to_xml(),
            XmlValue::Text("10".to_string())
        );
        let with_unit = SizeValue::with_unit(10, SizeUnit::GiB).to_xml();
        let node = with_unit.as_node().unwrap();
        assert_eq!(node.attr("unit"), Some("GiB"));
        assert_eq!(node.text(), Some("10"));
    }

    #[test]
    fn test_all_unit_tokens_round_trip() {
        for token in [
            "B", "K", "KB", "KiB", "M", "MB", "MiB", "G", "GB", "GiB", "T", "TB", "TiB", "P",
            "PB", "PiB", "E", "EB", "EiB",
        ] {
            let unit = SizeUnit::parse(token).expect(token);
            assert_eq!(unit.as_str(), token);
        }
    }
}
