//! Arena-backed syntax tree IR.
//!
//! `lumen-ir` is the contract every stage of the toolchain shares: readers
//! populate an [`Arena`], the [`document`] module renders it as the canonical
//! JSON document, and consumers on the other side of a runtime boundary
//! rebuild their own arena from those bytes.
//!
//! # Architecture
//!
//! ```text
//! build pass ──> Arena ──> to_canonical_bytes ──> bytes ──> from_slice ──> Arena
//!               (ids)        (document.rs)                                (consumer)
//! ```
//!
//! Nodes refer to each other by [`NodeId`] only. Parent/child links are kept
//! consistent by the arena; attribute references ([`NodeValue::ArrayRef`],
//! [`NodeValue::ObjectRef`]) must resolve but are not tree edges.
//!
//! # Example
//!
//! ```
//! use lumen_ir::{Arena, NodeType, NodeValue, document};
//!
//! let mut arena = Arena::new();
//! let ident = arena.create_node(NodeType::Identifier);
//! arena.add_child(arena.root_id(), ident)?;
//! arena.set_attribute(ident, "name", NodeValue::from("x"))?;
//!
//! let bytes = document::to_canonical_bytes(&arena);
//! let copy = document::from_slice(&bytes)?;
//! assert_eq!(copy.get(ident).and_then(|n| n.get_string("name")), Some("x"));
//! # Ok::<(), lumen_ir::IrError>(())
//! ```

pub mod arena;
pub mod document;
pub mod error;
pub mod node;
pub mod structure_eq;
pub mod value;

pub use arena::{Arena, Strictness};
pub use error::{ErrorKind, IrError};
pub use node::{MAX_NEXT_ID, Node, NodeId, NodeType, SourceLocation};
pub use structure_eq::StructureEq;
pub use value::NodeValue;
