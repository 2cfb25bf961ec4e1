//! ixml - a destructive, in-place XML 1.0 parser, arena DOM, and
//! streaming serializer.
//!
//! The hard engineering lives in two places: [`parser::parse`], which
//! advances a cursor through a writable `\0`-terminated buffer while
//! rewriting it in place to hold decoded attribute values and text runs
//! (so every event slice it hands to a [`handler::Handler`] is a
//! zero-copy view into storage the caller already owns), and
//! [`dom::Document`], an arena-backed node tree built directly on those
//! slices with intrusive doubly-linked child and attribute lists. A
//! [`serializer::Serializer`] writes either stream back out to a byte
//! sink, sharing the same handler contract.
//!
//! ```
//! use ixml::dom::{DomBuilder, NodeRef};
//! use ixml::handler::ParserFlags;
//! use ixml::parser::parse;
//!
//! let mut input = b"<r a=\"1\"><child/>text</r>\0".to_vec();
//! let mut builder = DomBuilder::new();
//! parse(&mut input, ParserFlags::default(), &mut builder).unwrap();
//! let doc = builder.into_document();
//!
//! let root = doc.get_root_element().unwrap();
//! assert_eq!(doc.name(root).unwrap(), Some(&b"r"[..]));
//! assert_eq!(doc.get_attribute(root, b"a").unwrap(), Some(&b"1"[..]));
//! ```
//!
//! The crucial system invariant: the input buffer must outlive every
//! emitted slice and every DOM node built from those slices. The parser
//! mutates the buffer; the DOM never copies out of it.

pub mod chartables;
pub mod dom;
pub mod entities;
pub mod error;
pub mod handler;
pub mod parser;
pub mod serializer;

pub use dom::{Document, DomBuilder};
pub use error::{DomError, ParseError};
pub use handler::{Handler, NullHandler, ParserFlags};
pub use parser::parse;
pub use serializer::{write_document, Serializer, Sink};
