//! Arena node identifiers and payloads.
//!
//! `NodeId` is a generation-checked index into a [`Document`](crate::dom::Document)'s
//! node arena: the generation lets [`Document::clear`](crate::dom::Document::clear)
//! invalidate every handle obtained before the reset without requiring the
//! arena's backing storage to be reallocated or the handle type to carry a
//! lifetime of its own.

use std::num::NonZeroU32;

/// A handle into a [`Document`](crate::dom::Document)'s node arena.
///
/// Valid only for the document that produced it, and only until that
/// document's next [`clear`](crate::dom::Document::clear) call. Using a
/// stale handle returns a [`DomError`](crate::error::DomError) rather than
/// panicking or reading unrelated data, since the generation is checked on
/// every arena access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: NonZeroU32,
}

/// A handle into a [`Document`](crate::dom::Document)'s attribute arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrId {
    pub(crate) index: u32,
    pub(crate) generation: NonZeroU32,
}

/// The container a node is attached to: either the document itself, or an
/// element (the only two kinds that may own children, per the data model).
///
/// This doubles as the "current position" a [`DomBuilder`](crate::dom::builder::DomBuilder)
/// descends/ascends through, and is the precondition-carrying field stored
/// as a node's `parent`: `None` means detached (or, for the document
/// itself, that there is no parent to speak of).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Document,
    Element(NodeId),
}

/// The kind of content a node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Payload<'a> {
    Element { name: &'a [u8] },
    Text(&'a [u8]),
    CData(&'a [u8]),
    Comment(&'a [u8]),
    Pi { target: &'a [u8], value: &'a [u8] },
}

impl<'a> Payload<'a> {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            Payload::Element { .. } => NodeKind::Element,
            Payload::Text(_) => NodeKind::Text,
            Payload::CData(_) => NodeKind::CData,
            Payload::Comment(_) => NodeKind::Comment,
            Payload::Pi { .. } => NodeKind::ProcessingInstruction,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct XmlNode<'a> {
    pub(crate) payload: Payload<'a>,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    /// Head of this element's attribute list, threaded through the
    /// attribute arena's own `next` links. `None` for non-elements and for
    /// elements with no attributes.
    pub(crate) first_attr: Option<AttrId>,
    /// Tail of the attribute list, so [`Document::append_attribute`] stays
    /// O(1).
    pub(crate) last_attr: Option<AttrId>,
}

impl<'a> XmlNode<'a> {
    pub(crate) fn new(payload: Payload<'a>) -> Self {
        XmlNode {
            payload,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            first_attr: None,
            last_attr: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct XmlAttribute<'a> {
    pub(crate) name: &'a [u8],
    pub(crate) value: &'a [u8],
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev: Option<AttrId>,
    pub(crate) next: Option<AttrId>,
}
