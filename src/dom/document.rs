//! The arena-backed DOM (C3).
//!
//! [`Document`] owns every node and attribute it creates in two flat
//! arenas (`Vec<XmlNode>`, `Vec<XmlAttribute>`); mutation methods only
//! ever adjust the intrusive `prev`/`next`/`parent`/`first_attr` links
//! described in the data model, never move or copy node storage. Because
//! nodes have no destructor of their own, [`Document::clear`] releases
//! everything in one step by truncating both arenas and bumping a
//! generation counter, which is cheaper and simpler than the source's
//! chunked bump allocator while preserving its single O(1) "free
//! everything" operation.
//!
//! String payloads are `&'a [u8]` slices into whatever buffer produced
//! them — typically the same buffer [`crate::parser::parse`] rewrote in
//! place. The document borrows nothing from that buffer directly; it only
//! stores the slices, so the buffer must outlive the document (the
//! crucial system invariant carried over from spec.md §2).

use std::num::NonZeroU32;

use crate::error::DomError;

use super::node::{AttrId, NodeId, NodeKind, NodeRef, Payload, XmlAttribute, XmlNode};

/// An XML document: an arena of nodes and attributes, plus the top-level
/// child list that plays the role of the "Document" node kind from the
/// data model. Document itself is never addressed by a [`NodeId`] — its
/// children's `parent` field is [`NodeRef::Document`] instead.
pub struct Document<'a> {
    nodes: Vec<XmlNode<'a>>,
    attrs: Vec<XmlAttribute<'a>>,
    generation: NonZeroU32,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

impl<'a> Default for Document<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Document<'a> {
    pub fn new() -> Self {
        Document {
            nodes: Vec::new(),
            attrs: Vec::new(),
            generation: NonZeroU32::new(1).unwrap(),
            first_child: None,
            last_child: None,
        }
    }

    // -- arena access, generation-checked -----------------------------

    fn check_generation(&self, generation: NonZeroU32) -> Result<(), DomError> {
        if generation != self.generation {
            return Err(DomError::new(
                "stale handle: document was cleared since this id was created",
            ));
        }
        Ok(())
    }

    fn node(&self, id: NodeId) -> Result<&XmlNode<'a>, DomError> {
        self.check_generation(id.generation)?;
        self.nodes
            .get(id.index as usize)
            .ok_or_else(|| DomError::new("node id out of range"))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut XmlNode<'a>, DomError> {
        self.check_generation(id.generation)?;
        self.nodes
            .get_mut(id.index as usize)
            .ok_or_else(|| DomError::new("node id out of range"))
    }

    fn attr(&self, id: AttrId) -> Result<&XmlAttribute<'a>, DomError> {
        self.check_generation(id.generation)?;
        self.attrs
            .get(id.index as usize)
            .ok_or_else(|| DomError::new("attribute id out of range"))
    }

    fn attr_mut(&mut self, id: AttrId) -> Result<&mut XmlAttribute<'a>, DomError> {
        self.check_generation(id.generation)?;
        self.attrs
            .get_mut(id.index as usize)
            .ok_or_else(|| DomError::new("attribute id out of range"))
    }

    // -- factories ------------------------------------------------------

    fn alloc_node(&mut self, payload: Payload<'a>) -> NodeId {
        let index = self.nodes.len() as u32;
        self.nodes.push(XmlNode::new(payload));
        NodeId {
            index,
            generation: self.generation,
        }
    }

    pub fn create_element(&mut self, name: &'a [u8]) -> NodeId {
        self.alloc_node(Payload::Element { name })
    }

    pub fn create_text(&mut self, value: &'a [u8]) -> NodeId {
        self.alloc_node(Payload::Text(value))
    }

    pub fn create_cdata(&mut self, value: &'a [u8]) -> NodeId {
        self.alloc_node(Payload::CData(value))
    }

    pub fn create_comment(&mut self, value: &'a [u8]) -> NodeId {
        self.alloc_node(Payload::Comment(value))
    }

    pub fn create_pi(&mut self, target: &'a [u8], value: &'a [u8]) -> NodeId {
        self.alloc_node(Payload::Pi { target, value })
    }

    /// Create a detached attribute. Attach it to an element with
    /// [`Document::append_attribute`].
    pub fn create_attribute(&mut self, name: &'a [u8], value: &'a [u8]) -> AttrId {
        let index = self.attrs.len() as u32;
        self.attrs.push(XmlAttribute {
            name,
            value,
            parent: None,
            prev: None,
            next: None,
        });
        AttrId {
            index,
            generation: self.generation,
        }
    }

    // -- accessors --------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> Result<NodeKind, DomError> {
        Ok(self.node(id)?.payload.kind())
    }

    pub fn parent_of(&self, id: NodeId) -> Result<Option<NodeRef>, DomError> {
        Ok(self.node(id)?.parent)
    }

    pub fn next_sibling(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.node(id)?.next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.node(id)?.prev_sibling)
    }

    pub fn first_child(&self, parent: NodeRef) -> Result<Option<NodeId>, DomError> {
        match parent {
            NodeRef::Document => Ok(self.first_child),
            NodeRef::Element(id) => Ok(self.node(id)?.first_child),
        }
    }

    /// The element or processing-instruction name, or `None` for kinds
    /// without one.
    pub fn name(&self, id: NodeId) -> Result<Option<&'a [u8]>, DomError> {
        Ok(match self.node(id)?.payload {
            Payload::Element { name } => Some(name),
            Payload::Pi { target, .. } => Some(target),
            _ => None,
        })
    }

    /// The text/CDATA/comment/PI value, or `None` for an element.
    pub fn value(&self, id: NodeId) -> Result<Option<&'a [u8]>, DomError> {
        Ok(match self.node(id)?.payload {
            Payload::Element { .. } => None,
            Payload::Text(v) | Payload::CData(v) | Payload::Comment(v) => Some(v),
            Payload::Pi { value, .. } => Some(value),
        })
    }

    pub fn attr_name(&self, id: AttrId) -> Result<&'a [u8], DomError> {
        Ok(self.attr(id)?.name)
    }

    pub fn attr_value(&self, id: AttrId) -> Result<&'a [u8], DomError> {
        Ok(self.attr(id)?.value)
    }

    /// The first attribute of `element`, in document order. `None` once
    /// exhausted; advance with the id's own `next` via [`Document::next_attr`].
    pub fn first_attr(&self, element: NodeId) -> Result<Option<AttrId>, DomError> {
        let node = self.node(element)?;
        if !matches!(node.payload, Payload::Element { .. }) {
            return Err(DomError::new("first_attr: node is not an element"));
        }
        Ok(node.first_attr)
    }

    pub fn next_attr(&self, id: AttrId) -> Result<Option<AttrId>, DomError> {
        Ok(self.attr(id)?.next)
    }

    /// Convenience: collect `(name, value)` for every attribute of
    /// `element`, in document order.
    pub fn attributes(&self, element: NodeId) -> Result<Vec<(&'a [u8], &'a [u8])>, DomError> {
        let mut out = Vec::new();
        let mut next = self.first_attr(element)?;
        while let Some(id) = next {
            let a = self.attr(id)?;
            out.push((a.name, a.value));
            next = a.next;
        }
        Ok(out)
    }

    /// `O(attrs)` linear lookup, matching the source DOM's own
    /// `getAttribute` (a flat intrusive list has no faster path).
    pub fn get_attribute(&self, element: NodeId, name: &[u8]) -> Result<Option<&'a [u8]>, DomError> {
        let mut next = self.first_attr(element)?;
        while let Some(id) = next {
            let a = self.attr(id)?;
            if a.name == name {
                return Ok(Some(a.value));
            }
            next = a.next;
        }
        Ok(None)
    }

    pub fn has_attribute(&self, element: NodeId, name: &[u8]) -> Result<bool, DomError> {
        Ok(self.get_attribute(element, name)?.is_some())
    }

    /// The first child of `parent` whose kind is `kind`, or `None`.
    /// `O(children)`, matching the source DOM's own kind-filtered
    /// `getFirstChild`/`getNextSibling`.
    pub fn first_child_of_kind(&self, parent: NodeRef, kind: NodeKind) -> Result<Option<NodeId>, DomError> {
        let mut next = self.first_child(parent)?;
        while let Some(id) = next {
            if self.kind(id)? == kind {
                return Ok(Some(id));
            }
            next = self.next_sibling(id)?;
        }
        Ok(None)
    }

    /// The next sibling after `id` whose kind is `kind`, or `None`.
    pub fn next_sibling_of_kind(&self, id: NodeId, kind: NodeKind) -> Result<Option<NodeId>, DomError> {
        let mut next = self.next_sibling(id)?;
        while let Some(cand) = next {
            if self.kind(cand)? == kind {
                return Ok(Some(cand));
            }
            next = self.next_sibling(cand)?;
        }
        Ok(None)
    }

    // -- mutation ----------------------------------------------------------

    fn is_element(&self, id: NodeId) -> Result<bool, DomError> {
        Ok(matches!(self.node(id)?.payload, Payload::Element { .. }))
    }

    /// Append `child` as the new last child of `parent`. `child` must be
    /// detached. O(1).
    pub fn append_child(&mut self, parent: NodeRef, child: NodeId) -> Result<(), DomError> {
        if self.node(child)?.parent.is_some() {
            return Err(DomError::new("append_child: child must be detached"));
        }
        if let NodeRef::Element(pid) = parent {
            if !self.is_element(pid)? {
                return Err(DomError::new(
                    "append_child: parent must be the document or an element",
                ));
            }
        }

        let prev_last = match parent {
            NodeRef::Document => self.last_child,
            NodeRef::Element(pid) => self.node(pid)?.last_child,
        };

        match prev_last {
            Some(last) => self.node_mut(last)?.next_sibling = Some(child),
            None => match parent {
                NodeRef::Document => self.first_child = Some(child),
                NodeRef::Element(pid) => self.node_mut(pid)?.first_child = Some(child),
            },
        }

        {
            let c = self.node_mut(child)?;
            c.prev_sibling = prev_last;
            c.next_sibling = None;
            c.parent = Some(parent);
        }

        match parent {
            NodeRef::Document => self.last_child = Some(child),
            NodeRef::Element(pid) => self.node_mut(pid)?.last_child = Some(child),
        }
        Ok(())
    }

    /// Insert `child` immediately before `reference`, which must already
    /// be attached. Precondition (per the design notes' correction of the
    /// source's assertion): `child` is detached and `reference` is not.
    /// O(1).
    pub fn insert_before(&mut self, child: NodeId, reference: NodeId) -> Result<(), DomError> {
        if self.node(child)?.parent.is_some() {
            return Err(DomError::new("insert_before: child must be detached"));
        }
        let parent = self
            .node(reference)?
            .parent
            .ok_or_else(|| DomError::new("insert_before: reference must be attached"))?;
        let prev = self.node(reference)?.prev_sibling;

        match prev {
            Some(p) => self.node_mut(p)?.next_sibling = Some(child),
            None => match parent {
                NodeRef::Document => self.first_child = Some(child),
                NodeRef::Element(pid) => self.node_mut(pid)?.first_child = Some(child),
            },
        }

        {
            let c = self.node_mut(child)?;
            c.prev_sibling = prev;
            c.next_sibling = Some(reference);
            c.parent = Some(parent);
        }
        self.node_mut(reference)?.prev_sibling = Some(child);
        Ok(())
    }

    /// Detach `child` from `parent`'s child list. `child.parent` must
    /// equal `parent`. O(1).
    pub fn remove_child(&mut self, parent: NodeRef, child: NodeId) -> Result<(), DomError> {
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::new(
                "remove_child: child is not attached to the given parent",
            ));
        }
        let (prev, next) = {
            let c = self.node(child)?;
            (c.prev_sibling, c.next_sibling)
        };

        match prev {
            Some(p) => self.node_mut(p)?.next_sibling = next,
            None => match parent {
                NodeRef::Document => self.first_child = next,
                NodeRef::Element(pid) => self.node_mut(pid)?.first_child = next,
            },
        }
        match next {
            Some(n) => self.node_mut(n)?.prev_sibling = prev,
            None => match parent {
                NodeRef::Document => self.last_child = prev,
                NodeRef::Element(pid) => self.node_mut(pid)?.last_child = prev,
            },
        }

        let c = self.node_mut(child)?;
        c.parent = None;
        c.prev_sibling = None;
        c.next_sibling = None;
        Ok(())
    }

    /// Append `attr` to the end of `element`'s attribute list. `attr`
    /// must be detached. O(1).
    pub fn append_attribute(&mut self, element: NodeId, attr: AttrId) -> Result<(), DomError> {
        if !self.is_element(element)? {
            return Err(DomError::new("append_attribute: node is not an element"));
        }
        if self.attr(attr)?.parent.is_some() {
            return Err(DomError::new("append_attribute: attribute must be detached"));
        }
        let prev_last = self.node(element)?.last_attr;
        match prev_last {
            Some(last) => self.attr_mut(last)?.next = Some(attr),
            None => self.node_mut(element)?.first_attr = Some(attr),
        }
        {
            let a = self.attr_mut(attr)?;
            a.prev = prev_last;
            a.next = None;
            a.parent = Some(element);
        }
        self.node_mut(element)?.last_attr = Some(attr);
        Ok(())
    }

    /// Remove `attr` from `element`'s attribute list. O(1).
    pub fn remove_attribute(&mut self, element: NodeId, attr: AttrId) -> Result<(), DomError> {
        if self.attr(attr)?.parent != Some(element) {
            return Err(DomError::new(
                "remove_attribute: attribute is not attached to the given element",
            ));
        }
        let (prev, next) = {
            let a = self.attr(attr)?;
            (a.prev, a.next)
        };
        match prev {
            Some(p) => self.attr_mut(p)?.next = next,
            None => self.node_mut(element)?.first_attr = next,
        }
        match next {
            Some(n) => self.attr_mut(n)?.prev = prev,
            None => self.node_mut(element)?.last_attr = prev,
        }
        let a = self.attr_mut(attr)?;
        a.parent = None;
        a.prev = None;
        a.next = None;
        Ok(())
    }

    /// The first Element among the document's top-level children, per
    /// invariant 6 (a document's child list may hold at most one element
    /// plus any number of comments/PIs; this is not enforced at
    /// construction, only here).
    pub fn get_root_element(&self) -> Result<NodeId, DomError> {
        let mut next = self.first_child;
        while let Some(id) = next {
            let node = self.node(id).expect("top-level child id must be live");
            if matches!(node.payload, Payload::Element { .. }) {
                return Ok(id);
            }
            next = node.next_sibling;
        }
        Err(DomError::new("document has no root element"))
    }

    /// Release every node and attribute in one step and invalidate every
    /// outstanding [`NodeId`]/[`AttrId`] obtained before this call
    /// (invariant 5).
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.attrs.clear();
        self.first_child = None;
        self.last_child = None;
        self.generation = NonZeroU32::new(self.generation.get().wrapping_add(1))
            .unwrap_or_else(|| NonZeroU32::new(1).unwrap());
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_walk_children() {
        let mut doc = Document::new();
        let root = doc.create_element(b"list");
        doc.append_child(NodeRef::Document, root).unwrap();

        let person = doc.create_element(b"person");
        doc.append_child(NodeRef::Element(root), person).unwrap();
        let name = doc.create_attribute(b"name", b"X");
        doc.append_attribute(person, name).unwrap();

        assert_eq!(doc.get_root_element().unwrap(), root);
        let first = doc.first_child(NodeRef::Element(root)).unwrap().unwrap();
        assert_eq!(first, person);
        assert_eq!(doc.name(person).unwrap(), Some(&b"person"[..]));
        assert_eq!(doc.attributes(person).unwrap(), vec![(&b"name"[..], &b"X"[..])]);
    }

    #[test]
    fn append_child_requires_detached_child() {
        let mut doc = Document::new();
        let root = doc.create_element(b"r");
        doc.append_child(NodeRef::Document, root).unwrap();
        let other = doc.create_element(b"other");
        doc.append_child(NodeRef::Document, other).unwrap();
        assert!(doc.append_child(NodeRef::Element(root), other).is_err());
    }

    #[test]
    fn remove_child_relinks_siblings() {
        let mut doc = Document::new();
        let root = doc.create_element(b"r");
        doc.append_child(NodeRef::Document, root).unwrap();
        let a = doc.create_text(b"a");
        let b = doc.create_text(b"b");
        let c = doc.create_text(b"c");
        for n in [a, b, c] {
            doc.append_child(NodeRef::Element(root), n).unwrap();
        }
        doc.remove_child(NodeRef::Element(root), b).unwrap();

        let first = doc.first_child(NodeRef::Element(root)).unwrap().unwrap();
        assert_eq!(first, a);
        assert_eq!(doc.next_sibling(a).unwrap(), Some(c));
        assert_eq!(doc.prev_sibling(c).unwrap(), Some(a));
        assert!(doc.parent_of(b).unwrap().is_none());
    }

    #[test]
    fn insert_before_splices_into_sibling_list() {
        let mut doc = Document::new();
        let root = doc.create_element(b"r");
        doc.append_child(NodeRef::Document, root).unwrap();
        let a = doc.create_text(b"a");
        let c = doc.create_text(b"c");
        doc.append_child(NodeRef::Element(root), a).unwrap();
        doc.append_child(NodeRef::Element(root), c).unwrap();

        let b = doc.create_text(b"b");
        doc.insert_before(b, c).unwrap();

        assert_eq!(doc.next_sibling(a).unwrap(), Some(b));
        assert_eq!(doc.next_sibling(b).unwrap(), Some(c));
        assert_eq!(doc.prev_sibling(c).unwrap(), Some(b));
    }

    #[test]
    fn clear_invalidates_old_handles() {
        let mut doc = Document::new();
        let root = doc.create_element(b"r");
        doc.append_child(NodeRef::Document, root).unwrap();
        doc.clear();
        assert!(doc.kind(root).is_err());
        assert!(doc.get_root_element().is_err());

        let fresh = doc.create_element(b"fresh");
        doc.append_child(NodeRef::Document, fresh).unwrap();
        assert_eq!(doc.get_root_element().unwrap(), fresh);
    }

    #[test]
    fn get_root_element_skips_leading_comments_and_pis() {
        let mut doc = Document::new();
        let c = doc.create_comment(b"c");
        doc.append_child(NodeRef::Document, c).unwrap();
        let pi = doc.create_pi(b"pi", b"x");
        doc.append_child(NodeRef::Document, pi).unwrap();
        let root = doc.create_element(b"r");
        doc.append_child(NodeRef::Document, root).unwrap();

        assert_eq!(doc.get_root_element().unwrap(), root);
    }

    #[test]
    fn attribute_convenience_lookups() {
        let mut doc = Document::new();
        let root = doc.create_element(b"r");
        doc.append_child(NodeRef::Document, root).unwrap();
        let a = doc.create_attribute(b"a", b"1");
        doc.append_attribute(root, a).unwrap();

        assert_eq!(doc.get_attribute(root, b"a").unwrap(), Some(&b"1"[..]));
        assert!(doc.has_attribute(root, b"a").unwrap());
        assert!(!doc.has_attribute(root, b"missing").unwrap());
    }

    #[test]
    fn kind_filtered_sibling_walk() {
        let mut doc = Document::new();
        let root = doc.create_element(b"r");
        doc.append_child(NodeRef::Document, root).unwrap();
        let t = doc.create_text(b"x");
        doc.append_child(NodeRef::Element(root), t).unwrap();
        let e = doc.create_element(b"child");
        doc.append_child(NodeRef::Element(root), e).unwrap();

        let first_elem = doc
            .first_child_of_kind(NodeRef::Element(root), NodeKind::Element)
            .unwrap();
        assert_eq!(first_elem, Some(e));
    }

    #[test]
    fn get_root_element_fails_with_no_element_child() {
        let mut doc = Document::new();
        let c = doc.create_comment(b"only a comment");
        doc.append_child(NodeRef::Document, c).unwrap();
        assert!(doc.get_root_element().is_err());
    }
}
