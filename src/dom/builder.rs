//! The DOM-construction [`Handler`]: turns a parser event stream into a
//! [`Document`].
//!
//! `current` tracks where the next child gets appended, starting at
//! [`NodeRef::Document`]. `start_element` creates an element, appends it
//! under `current`, pushes the old `current` onto `stack`, and descends.
//! Per the discipline this crate picked for the `end_attributes`/
//! `end_element` ambiguity documented in spec.md §9: `end_attributes(true)`
//! (a self-closing element) ascends immediately and no matching
//! `end_element` follows; `end_attributes(false)` does not ascend, and the
//! later `end_element` does.

use crate::dom::{Document, NodeRef};
use crate::handler::Handler;

/// Builds a [`Document`] by consuming the event stream from
/// [`crate::parser::parse`]. Construct one, drive it with `parse`, then
/// call [`DomBuilder::into_document`].
pub struct DomBuilder<'a> {
    document: Document<'a>,
    current: NodeRef,
    stack: Vec<NodeRef>,
}

impl<'a> Default for DomBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DomBuilder<'a> {
    pub fn new() -> Self {
        DomBuilder {
            document: Document::new(),
            current: NodeRef::Document,
            stack: Vec::new(),
        }
    }

    /// Consume the builder, returning the document it assembled.
    pub fn into_document(self) -> Document<'a> {
        self.document
    }
}

impl<'a> Handler<'a> for DomBuilder<'a> {
    fn start_element(&mut self, name: &'a [u8]) {
        let id = self.document.create_element(name);
        self.document
            .append_child(self.current, id)
            .expect("DOM builder: current is always a valid append target");
        self.stack.push(self.current);
        self.current = NodeRef::Element(id);
    }

    fn attribute(&mut self, name: &'a [u8], value: &'a [u8]) {
        let NodeRef::Element(id) = self.current else {
            unreachable!("parser never emits attribute outside an open element");
        };
        let attr = self.document.create_attribute(name, value);
        self.document
            .append_attribute(id, attr)
            .expect("DOM builder: attribute always targets the just-created element");
    }

    fn end_attributes(&mut self, empty: bool) {
        if empty {
            self.current = self
                .stack
                .pop()
                .expect("DOM builder: start_element always pushes before end_attributes");
        }
    }

    fn end_element(&mut self, _name: &'a [u8]) {
        self.current = self
            .stack
            .pop()
            .expect("DOM builder: end_element is only emitted for non-empty elements");
    }

    fn text(&mut self, value: &'a [u8]) {
        let id = self.document.create_text(value);
        self.document.append_child(self.current, id).expect("append text");
    }

    fn cdata(&mut self, value: &'a [u8]) {
        let id = self.document.create_cdata(value);
        self.document.append_child(self.current, id).expect("append cdata");
    }

    fn comment(&mut self, value: &'a [u8]) {
        let id = self.document.create_comment(value);
        self.document.append_child(self.current, id).expect("append comment");
    }

    fn processing_instruction(&mut self, target: &'a [u8], value: &'a [u8]) {
        let id = self.document.create_pi(target, value);
        self.document.append_child(self.current, id).expect("append pi");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeKind;
    use crate::handler::ParserFlags;
    use crate::parser::parse;

    fn buf(s: &str) -> Vec<u8> {
        let mut v = s.as_bytes().to_vec();
        v.push(0);
        v
    }

    #[test]
    fn builds_tree_with_nested_elements_and_attributes() {
        let mut input = buf(r#"<list><person name="X" age="1"/></list>"#);
        let mut builder = DomBuilder::new();
        parse(&mut input, ParserFlags::default(), &mut builder).unwrap();
        let doc = builder.into_document();

        let list = doc.get_root_element().unwrap();
        assert_eq!(doc.name(list).unwrap(), Some(&b"list"[..]));
        let person = doc.first_child(NodeRef::Element(list)).unwrap().unwrap();
        assert_eq!(doc.kind(person).unwrap(), NodeKind::Element);
        assert_eq!(
            doc.attributes(person).unwrap(),
            vec![(&b"name"[..], &b"X"[..]), (&b"age"[..], &b"1"[..])]
        );
        assert!(doc.next_sibling(person).unwrap().is_none());
    }

    #[test]
    fn builds_text_and_comment_siblings() {
        let mut input = buf("<!--hi--><r>a<b/>c</r>");
        let mut builder = DomBuilder::new();
        parse(&mut input, ParserFlags::ENTITY_TRANSLATION, &mut builder).unwrap();
        let doc = builder.into_document();

        let root = doc.get_root_element().unwrap();
        let first = doc.first_child(NodeRef::Element(root)).unwrap().unwrap();
        assert_eq!(doc.kind(first).unwrap(), NodeKind::Text);
        assert_eq!(doc.value(first).unwrap(), Some(&b"a"[..]));
        let b = doc.next_sibling(first).unwrap().unwrap();
        assert_eq!(doc.kind(b).unwrap(), NodeKind::Element);
        let last = doc.next_sibling(b).unwrap().unwrap();
        assert_eq!(doc.value(last).unwrap(), Some(&b"c"[..]));
        assert!(doc.next_sibling(last).unwrap().is_none());
    }
}
