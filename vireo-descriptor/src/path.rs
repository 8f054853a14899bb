//! Path spec codec for `target`, `source`, and `backingStore` fields.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::xml::{XmlNode, XmlValue};

/// Volume format vocabulary: filesystem types for directory-backed pools
/// plus image formats for file-backed volumes.
///
/// Tokens are the exact lowercase libvirt values and are matched
/// case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    // filesystem formats
    None,
    Auto,
    Ext2,
    Ext3,
    Ext4,
    Ufs,
    Iso9660,
    Udf,
    Gfs,
    Gfs2,
    Vfat,
    #[serde(rename = "hfs+")]
    Hfs,
    Xfs,
    // file image formats
    Raw,
    Dir,
    Bochs,
    Cloop,
    Qcow,
    Dmg,
    Iso,
    Qcow2,
    Vmdk,
    Vpc,
}

impl FormatType {
    /// Get the libvirt format token.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::None => "none",
            FormatType::Auto => "auto",
            FormatType::Ext2 => "ext2",
            FormatType::Ext3 => "ext3",
            FormatType::Ext4 => "ext4",
            FormatType::Ufs => "ufs",
            FormatType::Iso9660 => "iso9660",
            FormatType::Udf => "udf",
            FormatType::Gfs => "gfs",
            FormatType::Gfs2 => "gfs2",
            FormatType::Vfat => "vfat",
            FormatType::Hfs => "hfs+",
            FormatType::Xfs => "xfs",
            FormatType::Raw => "raw",
            FormatType::Dir => "dir",
            FormatType::Bochs => "bochs",
            FormatType::Cloop => "cloop",
            FormatType::Qcow => "qcow",
            FormatType::Dmg => "dmg",
            FormatType::Iso => "iso",
            FormatType::Qcow2 => "qcow2",
            FormatType::Vmdk => "vmdk",
            FormatType::Vpc => "vpc",
        }
    }

    /// Match a token against the combined vocabulary, case-sensitively.
    pub fn parse(token: &str) -> Option<FormatType> {
        match token {
            "none" => Some(FormatType::None),
            "auto" => Some(FormatType::Auto),
            "ext2" => Some(FormatType::Ext2),
            "ext3" => Some(FormatType::Ext3),
            "ext4" => Some(FormatType::Ext4),
            "ufs" => Some(FormatType::Ufs),
            "iso9660" => Some(FormatType::Iso9660),
            "udf" => Some(FormatType::Udf),
            "gfs" => Some(FormatType::Gfs),
            "gfs2" => Some(FormatType::Gfs2),
            "vfat" => Some(FormatType::Vfat),
            "hfs+" => Some(FormatType::Hfs),
            "xfs" => Some(FormatType::Xfs),
            "raw" => Some(FormatType::Raw),
            "dir" => Some(FormatType::Dir),
            "bochs" => Some(FormatType::Bochs),
            "cloop" => Some(FormatType::Cloop),
            "qcow" => Some(FormatType::Qcow),
            "dmg" => Some(FormatType::Dmg),
            "iso" => Some(FormatType::Iso),
            "qcow2" => Some(FormatType::Qcow2),
            "vmdk" => Some(FormatType::Vmdk),
            "vpc" => Some(FormatType::Vpc),
            _ => None,
        }
    }
}

/// POSIX-style permission block attached to a path.
///
/// All four sub-fields are optional; a block with none of them set is
/// dropped during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Permissions {
    /// A block with one scalar applied identically to mode, owner, and
    /// group; no label.
    pub fn uniform(value: impl ToString) -> Self {
        let value = value.to_string();
        Self {
            mode: Some(value.clone()),
            owner: Some(value.clone()),
            group: Some(value),
            label: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.owner.is_none() && self.group.is_none() && self.label.is_none()
    }

    /// Normalize a decoded permissions value.
    ///
    /// A scalar fans out to mode/owner/group; a keyed node keeps only the
    /// four known sub-fields, silently dropping anything else. Returns
    /// `None` when no sub-field survived.
    pub fn from_xml(value: &XmlValue) -> Result<Option<Self>, SchemaError> {
        let permissions = match value {
            XmlValue::Number(number) => Self::uniform(number),
            XmlValue::Text(text) => {
                if text.is_empty() {
                    return Ok(None);
                }
                Self::uniform(text)
            }
            XmlValue::Node(node) => Self {
                mode: node.child("mode").and_then(XmlValue::scalar),
                owner: node.child("owner").and_then(XmlValue::scalar),
                group: node.child("group").and_then(XmlValue::scalar),
                label: node.child("label").and_then(XmlValue::scalar),
            },
        };
        if permissions.is_empty() {
            return Ok(None);
        }
        Ok(Some(permissions))
    }

    fn to_xml(&self) -> XmlValue {
        let mut node = XmlNode::new();
        if let Some(mode) = &self.mode {
            node.push_child("mode", mode.as_str());
        }
        if let Some(owner) = &self.owner {
            node.push_child("owner", owner.as_str());
        }
        if let Some(group) = &self.group {
            node.push_child("group", group.as_str());
        }
        if let Some(label) = &self.label {
            node.push_child("label", label.as_str());
        }
        XmlValue::Node(node)
    }
}

/// Path-bearing descriptor element shared by target, source, and
/// backingStore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSpec {
    /// Filesystem location of the volume data.
    pub path: String,
    /// On-disk format; re-wrapped as `<format type='…'/>` on unparse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
}

impl PathSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: None,
            permissions: None,
        }
    }

    /// Set the format type.
    pub fn with_format(mut self, format: FormatType) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the permission block.
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Validate a decoded field value, retaining path, format type, and
    /// permissions.
    ///
    /// Accepted shapes: bare text (the path) or an element node with a
    /// `path` child, an optional `format` child carrying a `type`
    /// attribute, and an optional `permissions` child.
    pub fn from_xml(value: &XmlValue) -> Result<Self, SchemaError> {
        match value {
            XmlValue::Text(text) => Ok(Self::new(text.clone())),
            XmlValue::Node(node) => {
                let path = required_path(node, value)?;
                let format = match node.child("format").and_then(XmlValue::as_node) {
                    Some(format_node) => match format_node.attr("type") {
                        Some(token) => Some(
                            FormatType::parse(token)
                                .ok_or_else(|| SchemaError::new("type", token))?,
                        ),
                        None => None,
                    },
                    None => None,
                };
                let permissions = match node.child("permissions") {
                    Some(permissions_value) => Permissions::from_xml(permissions_value)?,
                    None => None,
                };
                Ok(Self {
                    path,
                    format,
                    permissions,
                })
            }
            XmlValue::Number(_) => Err(SchemaError::new("value", value)),
        }
    }

    /// Validate a decoded field value, retaining only the path. Format and
    /// permissions present in the input are ignored without validation.
    pub fn from_xml_path_only(value: &XmlValue) -> Result<Self, SchemaError> {
        match value {
            XmlValue::Text(text) => Ok(Self::new(text.clone())),
            XmlValue::Node(node) => Ok(Self::new(required_path(node, value)?)),
            XmlValue::Number(_) => Err(SchemaError::new("value", value)),
        }
    }

    pub(crate) fn to_xml(&self) -> XmlValue {
        let mut node = XmlNode::new().with_child("path", self.path.as_str());
        if let Some(format) = self.format {
            node.push_child(
                "format",
                XmlNode::new().with_attribute("type", format.as_str()),
            );
        }
        if let Some(permissions) = &self.permissions {
            node.push_child("permissions", permissions.to_xml());
        }
        XmlValue::Node(node)
    }
}

fn required_path(node: &XmlNode, value: &XmlValue) -> Result<String, SchemaError> {
    match node.child("path") {
        Some(XmlValue::Text(path)) => Ok(path.clone()),
        Some(other) => Err(SchemaError::new("path", other)),
        None => Err(SchemaError::new("path", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_node(format: &str) -> XmlValue {
        XmlValue::Node(
            XmlNode::new()
                .with_child("path", "/vol1")
                .with_child("format", XmlNode::new().with_attribute("type", format)),
        )
    }

    #[test]
    fn test_bare_text_is_a_path() {
        let spec = PathSpec::from_xml(&XmlValue::from("/var/lib/vols/a")).unwrap();
        assert_eq!(spec.path, "/var/lib/vols/a");
        assert_eq!(spec.format, None);
        assert_eq!(spec.permissions, None);
    }

    #[test]
    fn test_full_node() {
        let value = XmlValue::Node(
            XmlNode::new()
                .with_child("path", "/vol1")
                .with_child("format", XmlNode::new().with_attribute("type", "qcow2"))
                .with_child(
                    "permissions",
                    XmlNode::new()
                        .with_child("mode", "0644")
                        .with_child("owner", "107"),
                ),
        );
        let spec = PathSpec::from_xml(&value).unwrap();
        assert_eq!(spec.path, "/vol1");
        assert_eq!(spec.format, Some(FormatType::Qcow2));
        let permissions = spec.permissions.unwrap();
        assert_eq!(permissions.mode.as_deref(), Some("0644"));
        assert_eq!(permissions.owner.as_deref(), Some("107"));
        assert_eq!(permissions.group, None);
    }

    #[test]
    fn test_missing_path_rejected() {
        let value = XmlValue::Node(
            XmlNode::new().with_child("format", XmlNode::new().with_attribute("type", "raw")),
        );
        let err = PathSpec::from_xml(&value).unwrap_err();
        assert_eq!(err.field(), "path");
    }

    #[test]
    fn test_non_text_path_rejected() {
        let value = XmlValue::Node(
            XmlNode::new().with_child("path", XmlNode::new().with_attribute("x", "y")),
        );
        assert!(PathSpec::from_xml(&value).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = PathSpec::from_xml(&target_node("bogus")).unwrap_err();
        assert_eq!(err.field(), "type");
        assert_eq!(err.value(), "bogus");
    }

    #[test]
    fn test_format_match_is_case_sensitive() {
        assert!(PathSpec::from_xml(&target_node("QCOW2")).is_err());
        assert!(PathSpec::from_xml(&target_node("Raw")).is_err());
        assert!(PathSpec::from_xml(&target_node("qcow2")).is_ok());
    }

    #[test]
    fn test_scalar_permissions_fan_out() {
        let value = XmlValue::Node(
            XmlNode::new()
                .with_child("path", "/v")
                .with_child("permissions", XmlValue::Number(0o644)),
        );
        let spec = PathSpec::from_xml(&value).unwrap();
        let expected = 0o644u64.to_string();
        let permissions = spec.permissions.unwrap();
        assert_eq!(permissions.mode.as_deref(), Some(expected.as_str()));
        assert_eq!(permissions.owner.as_deref(), Some(expected.as_str()));
        assert_eq!(permissions.group.as_deref(), Some(expected.as_str()));
        assert_eq!(permissions.label, None);
    }

    #[test]
    fn test_unknown_permission_keys_dropped() {
        let value = XmlValue::Node(
            XmlNode::new().with_child("path", "/v").with_child(
                "permissions",
                XmlNode::new()
                    .with_child("mode", "0600")
                    .with_child("bogus", "x"),
            ),
        );
        let spec = PathSpec::from_xml(&value).unwrap();
        let permissions = spec.permissions.unwrap();
        assert_eq!(
            permissions,
            Permissions {
                mode: Some("0600".to_string()),
                ..Permissions::default()
            }
        );
    }

    #[test]
    fn test_permissions_with_no_known_keys_dropped_entirely() {
        let value = XmlValue::Node(
            XmlNode::new()
                .with_child("path", "/v")
                .with_child("permissions", XmlNode::new().with_child("bogus", "x")),
        );
        let spec = PathSpec::from_xml(&value).unwrap();
        assert_eq!(spec.permissions, None);
    }

    #[test]
    fn test_path_only_ignores_format_and_permissions() {
        // A bogus format must not even be validated here.
        let value = XmlValue::Node(
            XmlNode::new()
                .with_child("path", "/src")
                .with_child("format", XmlNode::new().with_attribute("type", "bogus"))
                .with_child("permissions", XmlValue::Number(0o600)),
        );
        let spec = PathSpec::from_xml_path_only(&value).unwrap();
        assert_eq!(spec, PathSpec::new("/src"));
    }

    #[test]
    fn test_to_xml_wraps_format_as_attribute() {
        let spec = PathSpec::new("/vol1").with_format(FormatType::Qcow2);
        let value = spec.to_xml();
        let node = value.as_node().unwrap();
        assert_eq!(
            node.child("path"),
            Some(&XmlValue::Text("/vol1".to_string()))
        );
        let format = node.child("format").unwrap().as_node().unwrap();
        assert_eq!(format.attr("type"), Some("qcow2"));
    }

    #[test]
    fn test_format_tokens_round_trip() {
        for token in [
            "none", "auto", "ext2", "ext3", "ext4", "ufs", "iso9660", "udf", "gfs", "gfs2",
            "vfat", "hfs+", "xfs", "raw", "dir", "bochs", "cloop", "qcow", "dmg", "iso", "qcow2",
            "vmdk", "vpc",
        ] {
            let format = FormatType::parse(token).expect(token);
            assert_eq!(format.as_str(), token);
        }
    }
}
