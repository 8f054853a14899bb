//! # vireo Descriptor
//!
//! Bidirectional mappers between libvirt storage descriptor documents and
//! typed in-memory entities.
//!
//! The central piece is [`StorageVolume`], a validated model of the
//! libvirt volume schema: enumerated size units and format types,
//! polymorphic permission encodings, and a fixed element order on output.
//! Validation happens at assignment time, so a populated entity is always
//! internally consistent and a complete one can be serialized back out.
//!
//! ## Usage
//!
//! ```rust
//! use vireo_descriptor::StorageVolume;
//!
//! let xml = "<volume>\
//!            <name>vol1</name>\
//!            <capacity unit='GiB'>10</capacity>\
//!            <allocation unit='GiB'>10</allocation>\
//!            <target><path>/var/lib/libvirt/images/vol1.qcow2</path>\
//!            <format type='qcow2'/></target>\
//!            </volume>";
//!
//! let volume = StorageVolume::parse(xml).unwrap();
//! assert_eq!(volume.name(), Some("vol1"));
//!
//! let round_tripped = volume.unparse(false).unwrap();
//! assert_eq!(StorageVolume::parse(&round_tripped).unwrap(), volume);
//! ```
//!
//! Every `parse`/`unparse` call is a self-contained synchronous
//! transformation with no shared state; entities can be built and mapped
//! concurrently as long as a single instance is not mutated while read.

pub mod error;
pub mod path;
pub mod pool;
pub mod size;
pub mod volume;
pub mod xml;

pub use error::{MappingError, Result, SchemaError};
pub use path::{FormatType, PathSpec, Permissions};
pub use pool::StoragePool;
pub use size::{SizeUnit, SizeValue};
pub use volume::StorageVolume;
pub use xml::{XmlNode, XmlValue};
