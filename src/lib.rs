//! # xmldoc
//! A mutable, in-memory XML document model for writing XML.
//!
//! Documents are built tag by tag through [`TagMut`] handles, or generated from plain Rust values
//! with a [`mapping::MappingTable`], then turned into text with [`Document::serialize`].
//!
//! - Names are checked on the way in, so a document never holds an invalid tag or attribute name
//! - A tag holds either a value or child tags, never both
//! - Tree-wide operations rename, delete and edit attributes on every tag with a given name
//! - Tags can be found by path suffix with [`Tag::search`], or walked with [`Tag::accept`]
//!
//! Parsing is not supported; this crate only writes XML.
//!
//! ## Example
//! ```rust
//! use xmldoc::{Document, XmlResult};
//!
//! fn main() -> XmlResult<()> {
//!     let mut document = Document::with_root("plano")?;
//!     document.root_mut().build(|plano| {
//!         plano.add_value_tag("curso", "Mestrado em Engenharia de Informática")?;
//!         plano.add_tag_with("fuc", None, |fuc| {
//!             fuc.add_attribute("codigo", "M4310")?;
//!             fuc.add_value_tag("nome", "Programação Avançada")?;
//!             fuc.add_value_tag("ects", 6.0)?;
//!             Ok(())
//!         })?;
//!         Ok(())
//!     })?;
//!
//!     document.add_attribute_on_all_tags_named("fuc", "ativo", true)?;
//!     assert_eq!(document.search("fuc/ects")[0].value().unwrap().to_string(), "6.0");
//!
//!     println!("{}", document.serialize());
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]

mod error;
pub use error::{ErrorContext, XmlError, XmlErrorKind, XmlResult};

mod arena;
pub use arena::TagId;

mod node;
pub use node::*;

mod document;
pub use document::{DEFAULT_ROOT_NAME, Document};

pub mod mapping;
pub mod to_xml;
