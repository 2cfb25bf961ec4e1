//! The streaming event serializer (C4) and DOM tree serialization built on
//! top of it.
//!
//! [`Serializer`] is a [`Handler`] that writes canonical XML to a
//! [`Sink`], so it can drive directly off [`crate::parser::parse`] (for a
//! "normalize this document" pass) or off [`write_document`] walking a
//! [`Document`]. No escaping is applied to any value byte — per spec.md
//! §4.4 this is a deliberate performance decision; callers are
//! responsible for handing the serializer content that is already
//! XML-safe.
//!
//! [`Handler`]'s methods are infallible (`fn(&mut self, ...)`, no
//! `Result`), but a sink's `write_all` can fail. [`Serializer`] uses the
//! sticky-error pattern for this mismatch: the first write failure is
//! latched in `result` and every later write is skipped, so a fallible
//! sink composes with the handler contract without changing it. Call
//! [`Serializer::finish`] to recover that `Result` once driving is done.

use crate::dom::{Document, NodeKind, NodeRef};
use crate::handler::Handler;

/// A byte-oriented output sink: write exactly `bytes.len()` bytes, or
/// fail. Only the contract is specified here (spec.md §1 calls the sink
/// abstraction itself out of scope); the blanket impl below lets any
/// `std::io::Write` serve as one.
pub trait Sink {
    type Error;
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<W: std::io::Write> Sink for W {
    type Error = std::io::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), std::io::Error> {
        std::io::Write::write_all(self, bytes)
    }
}

/// Writes canonical XML to a [`Sink`] as events arrive.
pub struct Serializer<S: Sink> {
    sink: S,
    result: Result<(), S::Error>,
}

impl<S: Sink> Serializer<S> {
    pub fn new(sink: S) -> Self {
        Serializer {
            sink,
            result: Ok(()),
        }
    }

    /// Consume the serializer, returning the first write failure (if
    /// any) and the underlying sink.
    pub fn finish(self) -> (Result<(), S::Error>, S) {
        (self.result, self.sink)
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.result.is_ok() {
            self.result = self.sink.write_all(bytes);
        }
    }
}

impl<'a, S: Sink> Handler<'a> for Serializer<S> {
    fn start_element(&mut self, name: &'a [u8]) {
        self.write(b"<");
        self.write(name);
    }

    fn attribute(&mut self, name: &'a [u8], value: &'a [u8]) {
        self.write(b" ");
        self.write(name);
        self.write(b"=\"");
        self.write(value);
        self.write(b"\"");
    }

    fn end_attributes(&mut self, empty: bool) {
        self.write(if empty { b"/>" } else { b">" });
    }

    fn end_element(&mut self, name: &'a [u8]) {
        self.write(b"</");
        self.write(name);
        self.write(b">");
    }

    fn text(&mut self, value: &'a [u8]) {
        self.write(value);
    }

    fn cdata(&mut self, value: &'a [u8]) {
        self.write(b"<![CDATA[");
        self.write(value);
        self.write(b"]]>");
    }

    fn comment(&mut self, value: &'a [u8]) {
        self.write(b"<!--");
        self.write(value);
        self.write(b"-->");
    }

    fn processing_instruction(&mut self, target: &'a [u8], value: &'a [u8]) {
        self.write(b"<?");
        self.write(target);
        self.write(b" ");
        self.write(value);
        self.write(b"?>");
    }
}

/// Walk `doc` in document order and write it to `sink`, without
/// recursion: at each node, emit its opening; if it's an element with
/// children, descend; when a node has no `next` sibling, walk back up,
/// emitting `end_element` for each element ancestor, until a `next` is
/// found or the document root is reached. Mirrors the non-recursive
/// serialization walk specified in spec.md §4.3.
pub fn write_document<S: Sink>(doc: &Document<'_>, sink: S) -> Result<S, S::Error> {
    let mut ser = Serializer::new(sink);
    ser.start_document();

    let mut current = doc.first_child(NodeRef::Document).expect("NodeRef::Document is always valid");
    'walk: while let Some(id) = current {
        write_open(doc, &mut ser, id);

        if doc.kind(id).expect("live id") == NodeKind::Element {
            if let Some(child) = doc.first_child(NodeRef::Element(id)).expect("live id") {
                current = Some(child);
                continue 'walk;
            }
            // Childless element: `write_open` already emitted `/>` via
            // `end_attributes(true)`. No `end_element` follows, matching
            // the self-closing discipline `parser.rs`/`dom/builder.rs` use.
        }

        let mut node = id;
        loop {
            if let Some(next) = doc.next_sibling(node).expect("live id") {
                current = Some(next);
                continue 'walk;
            }
            match doc.parent_of(node).expect("live id") {
                Some(NodeRef::Element(parent)) => {
                    ser.end_element(doc.name(parent).expect("live id").expect("element has a name"));
                    node = parent;
                }
                _ => {
                    current = None;
                    continue 'walk;
                }
            }
        }
    }

    ser.end_document();
    let (result, sink) = ser.finish();
    result.map(|()| sink)
}

fn write_open<S: Sink>(doc: &Document<'_>, ser: &mut Serializer<S>, id: crate::dom::NodeId) {
    match doc.kind(id).expect("live id") {
        NodeKind::Element => {
            let name = doc.name(id).expect("live id").expect("element has a name");
            ser.start_element(name);
            for (attr_name, attr_value) in doc.attributes(id).expect("live id") {
                ser.attribute(attr_name, attr_value);
            }
            let empty = doc.first_child(NodeRef::Element(id)).expect("live id").is_none();
            ser.end_attributes(empty);
        }
        NodeKind::Text => ser.text(doc.value(id).expect("live id").expect("text has a value")),
        NodeKind::CData => ser.cdata(doc.value(id).expect("live id").expect("cdata has a value")),
        NodeKind::Comment => ser.comment(doc.value(id).expect("live id").expect("comment has a value")),
        NodeKind::ProcessingInstruction => {
            let target = doc.name(id).expect("live id").expect("pi has a target");
            let value = doc.value(id).expect("live id").expect("pi has a value");
            ser.processing_instruction(target, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomBuilder;
    use crate::handler::ParserFlags;
    use crate::parser::parse;

    fn buf(s: &str) -> Vec<u8> {
        let mut v = s.as_bytes().to_vec();
        v.push(0);
        v
    }

    #[test]
    fn serializer_emits_no_escaping() {
        let mut out = Vec::new();
        let mut ser = Serializer::new(&mut out);
        ser.start_element(b"r");
        ser.attribute(b"a", b"1");
        ser.end_attributes(false);
        ser.text(b"hi");
        ser.end_element(b"r");
        ser.finish().0.unwrap();
        assert_eq!(out, br#"<r a="1">hi</r>"#);
    }

    #[test]
    fn self_closing_element_serializes_with_empty_tag() {
        let mut out = Vec::new();
        let mut ser = Serializer::new(&mut out);
        ser.start_element(b"r");
        ser.end_attributes(true);
        ser.finish().0.unwrap();
        assert_eq!(out, b"<r/>");
    }

    #[test]
    fn dom_round_trip_through_parse_and_serialize() {
        let mut input = buf(r#"<list><person name="X" age="1"/></list>"#);
        let mut builder = DomBuilder::new();
        parse(&mut input, ParserFlags::default(), &mut builder).unwrap();
        let doc = builder.into_document();

        let out = write_document(&doc, Vec::new()).unwrap();
        assert_eq!(out, br#"<list><person name="X" age="1"/></list>"#);

        let mut roundtrip = out;
        roundtrip.push(0);
        let mut builder2 = DomBuilder::new();
        parse(&mut roundtrip, ParserFlags::default(), &mut builder2).unwrap();
        let doc2 = builder2.into_document();

        let root = doc.get_root_element().unwrap();
        let root2 = doc2.get_root_element().unwrap();
        assert_eq!(doc.name(root).unwrap(), doc2.name(root2).unwrap());
        let person = doc.first_child(NodeRef::Element(root)).unwrap().unwrap();
        let person2 = doc2.first_child(NodeRef::Element(root2)).unwrap().unwrap();
        assert_eq!(doc.attributes(person).unwrap(), doc2.attributes(person2).unwrap());
    }

    #[test]
    fn comments_and_pis_round_trip_at_top_level() {
        let mut input = buf(r#"<?xml version="1.0"?><!--c--><?pi x?><r/>"#);
        let mut builder = DomBuilder::new();
        parse(&mut input, ParserFlags::default(), &mut builder).unwrap();
        let doc = builder.into_document();

        let out = write_document(&doc, Vec::new()).unwrap();
        assert_eq!(out, br#"<!--c--><?pi x?><r/>"#);
    }
}
