//! Arena DOM (C3): a node tree built directly on the slices the parser
//! emits, with intrusive doubly-linked child and attribute lists. See
//! [`Document`] for the arena and mutation API, and [`builder::DomBuilder`]
//! for the handler that builds one from a parser event stream.

pub mod builder;
mod document;
mod node;

pub use builder::DomBuilder;
pub use document::Document;
pub use node::{AttrId, NodeId, NodeKind, NodeRef};
