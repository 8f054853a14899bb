//! Storage volume entity and its XML document codec.

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result, SchemaError};
use crate::path::PathSpec;
use crate::size::SizeValue;
use crate::xml::{self, XmlNode, XmlValue};

/// In-memory representation of a libvirt storage volume descriptor.
///
/// An entity starts out empty and is populated either by [`parse`] or by
/// direct assignment. It is complete, and therefore unparse-able, once
/// `name`, `capacity`, `allocation`, and `target` are all set; `key`,
/// `source`, and `backingStore` are emitted only when present.
///
/// All validation happens at the point of mutation: the `set_*` methods
/// reject invalid input with [`SchemaError`] and the entity only ever
/// stores validated value objects.
///
/// [`parse`]: StorageVolume::parse
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageVolume {
    name: Option<String>,
    key: Option<String>,
    capacity: Option<SizeValue>,
    allocation: Option<SizeValue>,
    target: Option<PathSpec>,
    source: Option<PathSpec>,
    backing_store: Option<PathSpec>,
}

impl StorageVolume {
    /// Create an empty entity.
    pub fn new() -> Self {
        Self::default()
    }

    // =====================
    //  Setters and getters
    // =====================

    /// Assign the volume name from a decoded value. Only text is accepted.
    pub fn set_name(&mut self, value: &XmlValue) -> std::result::Result<(), SchemaError> {
        match value.as_text() {
            Some(text) => {
                self.name = Some(text.to_string());
                Ok(())
            }
            None => Err(SchemaError::new("name", value)),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Assign the opaque volume key from a decoded value.
    pub fn set_key(&mut self, value: &XmlValue) -> std::result::Result<(), SchemaError> {
        match value.as_text() {
            Some(text) => {
                self.key = Some(text.to_string());
                Ok(())
            }
            None => Err(SchemaError::new("key", value)),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Assign the logical size from a decoded value.
    pub fn set_capacity(&mut self, value: &XmlValue) -> std::result::Result<(), SchemaError> {
        self.capacity = Some(SizeValue::from_xml(value)?);
        Ok(())
    }

    pub fn capacity(&self) -> Option<&SizeValue> {
        self.capacity.as_ref()
    }

    /// Assign the physically-allocated size from a decoded value.
    pub fn set_allocation(&mut self, value: &XmlValue) -> std::result::Result<(), SchemaError> {
        self.allocation = Some(SizeValue::from_xml(value)?);
        Ok(())
    }

    pub fn allocation(&self) -> Option<&SizeValue> {
        self.allocation.as_ref()
    }

    /// Assign the target location from a decoded value.
    pub fn set_target(&mut self, value: &XmlValue) -> std::result::Result<(), SchemaError> {
        self.target = Some(PathSpec::from_xml(value)?);
        Ok(())
    }

    pub fn target(&self) -> Option<&PathSpec> {
        self.target.as_ref()
    }

    /// Assign the external data source from a decoded value.
    ///
    /// Only the path is retained; format and permissions in the input are
    /// ignored. `None` or an empty value clears the field.
    pub fn set_source(
        &mut self,
        value: Option<&XmlValue>,
    ) -> std::result::Result<(), SchemaError> {
        self.source = match value {
            None => None,
            Some(value) if value.is_empty() => None,
            Some(value) => Some(PathSpec::from_xml_path_only(value)?),
        };
        Ok(())
    }

    pub fn source(&self) -> Option<&PathSpec> {
        self.source.as_ref()
    }

    /// Assign the backing volume from a decoded value.
    ///
    /// `None` or an empty value clears the field.
    pub fn set_backing_store(
        &mut self,
        value: Option<&XmlValue>,
    ) -> std::result::Result<(), SchemaError> {
        self.backing_store = match value {
            None => None,
            Some(value) if value.is_empty() => None,
            Some(value) => Some(PathSpec::from_xml(value)?),
        };
        Ok(())
    }

    pub fn backing_store(&self) -> Option<&PathSpec> {
        self.backing_store.as_ref()
    }

    // =====================
    //  Typed construction
    // =====================

    /// Set the volume name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the opaque volume key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the logical size.
    pub fn with_capacity(mut self, capacity: SizeValue) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the physically-allocated size.
    pub fn with_allocation(mut self, allocation: SizeValue) -> Self {
        self.allocation = Some(allocation);
        self
    }

    /// Set the target location.
    pub fn with_target(mut self, target: PathSpec) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the external data source. Only the path is kept, matching the
    /// narrowing applied when parsing documents.
    pub fn with_source(mut self, source: PathSpec) -> Self {
        self.source = Some(PathSpec::new(source.path));
        self
    }

    /// Set the backing volume.
    pub fn with_backing_store(mut self, backing_store: PathSpec) -> Self {
        self.backing_store = Some(backing_store);
        self
    }

    // =====================
    //  Document codec
    // =====================

    /// Parse a volume descriptor document into a populated entity.
    ///
    /// All failures (malformed XML, a missing mandatory element, or a
    /// field value rejected by a setter) surface as [`MappingError`].
    pub fn parse(xml_text: &str) -> Result<Self> {
        let (root_name, root) = xml::decode(xml_text)?;
        if root_name != "volume" {
            return Err(MappingError::MissingElement("volume"));
        }
        let empty = XmlNode::new();
        let node = root.as_node().unwrap_or(&empty);

        let mut volume = StorageVolume::new();
        volume.set_name(require(node, "name")?)?;
        if let Some(key) = node.child("key") {
            if !key.is_empty() {
                volume.set_key(key)?;
            }
        }
        volume.set_capacity(require(node, "capacity")?)?;
        volume.set_allocation(require(node, "allocation")?)?;
        volume.set_target(require(node, "target")?)?;
        volume.set_source(node.child("source"))?;
        volume.set_backing_store(node.child("backingStore"))?;
        Ok(volume)
    }

    /// Serialize the entity back to a volume descriptor document.
    ///
    /// Fails with [`MappingError::MissingMandatoryFields`] unless `name`,
    /// `capacity`, `allocation`, and `target` are all set. With `pretty`,
    /// the output is re-indented on a best-effort basis; if reformatting
    /// fails the compact document is returned instead.
    pub fn unparse(&self, pretty: bool) -> Result<String> {
        let (name, capacity, allocation, target) =
            match (&self.name, &self.capacity, &self.allocation, &self.target) {
                (Some(name), Some(capacity), Some(allocation), Some(target)) => {
                    (name, capacity, allocation, target)
                }
                _ => return Err(MappingError::MissingMandatoryFields),
            };

        let mut root = XmlNode::new();
        root.push_child("name", name.as_str());
        if let Some(key) = &self.key {
            root.push_child("key", key.as_str());
        }
        root.push_child("capacity", capacity.to_xml());
        root.push_child("allocation", allocation.to_xml());
        root.push_child("target", target.to_xml());
        if let Some(source) = &self.source {
            root.push_child("source", source.to_xml());
        }
        if let Some(backing_store) = &self.backing_store {
            root.push_child("backingStore", backing_store.to_xml());
        }

        let buffer = xml::encode("volume", &XmlValue::Node(root))?;
        if pretty {
            return Ok(xml::pretty(&buffer).unwrap_or(buffer));
        }
        Ok(buffer)
    }
}

fn require<'a>(node: &'a XmlNode, name: &'static str) -> Result<&'a XmlValue> {
    node.child(name).ok_or(MappingError::MissingElement(name))
}
