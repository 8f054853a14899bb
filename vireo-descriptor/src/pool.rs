//! Storage pool descriptor passthrough mapper.

use tracing::warn;

use crate::error::{MappingError, Result};
use crate::xml::{self, XmlNode, XmlValue};

/// A libvirt storage pool descriptor carried as its raw ordered tree.
///
/// Unlike [`StorageVolume`](crate::StorageVolume), the pool document is
/// not field-validated; this mapper only guarantees well-formed XML and
/// the `pool` root element, leaving the tree available for inspection
/// and editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoragePool(XmlNode);

impl StoragePool {
    /// Wrap an already-built tree.
    pub fn from_node(node: XmlNode) -> Self {
        Self(node)
    }

    /// The underlying ordered tree.
    pub fn node(&self) -> &XmlNode {
        &self.0
    }

    /// Mutable access to the underlying tree.
    pub fn node_mut(&mut self) -> &mut XmlNode {
        &mut self.0
    }

    /// Parse a pool descriptor document.
    pub fn parse(xml_text: &str) -> Result<Self> {
        let (root_name, root) = xml::decode(xml_text).map_err(|e| {
            warn!(error = %e, "failed to decode storage pool descriptor");
            MappingError::from(e)
        })?;
        if root_name != "pool" {
            warn!(root = %root_name, "storage pool descriptor has wrong root element");
            return Err(MappingError::MissingElement("pool"));
        }
        match root {
            XmlValue::Node(node) => Ok(Self(node)),
            // a bare or empty <pool> element decodes to text
            XmlValue::Text(text) => Ok(Self(XmlNode {
                text: if text.is_empty() { None } else { Some(text) },
                ..XmlNode::new()
            })),
            XmlValue::Number(_) => Ok(Self(XmlNode::new())),
        }
    }

    /// Serialize the descriptor back to XML text.
    ///
    /// With `pretty`, the output is re-indented on a best-effort basis;
    /// if reformatting fails the compact document is returned instead.
    pub fn unparse(&self, pretty: bool) -> Result<String> {
        let buffer =
            xml::encode("pool", &XmlValue::Node(self.0.clone())).map_err(|e| {
                warn!(error = %e, "failed to encode storage pool descriptor");
                MappingError::from(e)
            })?;
        if pretty {
            return Ok(xml::pretty(&buffer).unwrap_or(buffer));
        }
        Ok(buffer)
    }
}
