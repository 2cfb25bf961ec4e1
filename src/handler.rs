//! Parser configuration and the event handler contract.

use bitflags::bitflags;

bitflags! {
    /// Parser configuration flags. Combine with bitwise OR.
    ///
    /// Default is [`ParserFlags::TRIM_SPACE`] | [`ParserFlags::ENTITY_TRANSLATION`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParserFlags: u8 {
        /// Strip leading and trailing whitespace from each text run.
        const TRIM_SPACE = 0b0001;
        /// Collapse internal whitespace runs in text to a single `' '`.
        const NORMALIZE_SPACE = 0b0010;
        /// Decode the five predefined entities and numeric character
        /// references inside attribute values and text.
        const ENTITY_TRANSLATION = 0b0100;
        /// Accept any well-formed name in a closing tag, rather than
        /// requiring it to match the opening name byte-for-byte.
        const CLOSING_TAG_VALIDATE = 0b1000;
    }
}

impl Default for ParserFlags {
    fn default() -> Self {
        ParserFlags::TRIM_SPACE | ParserFlags::ENTITY_TRANSLATION
    }
}

/// Receives structural events from [`crate::parser::parse`].
///
/// Every slice argument carries the lifetime `'a` of the input buffer the
/// parser was given, so a [`Handler`] impl that wants to retain slices
/// beyond the callback (as [`crate::dom::DomBuilder`] does, to build a
/// zero-copy tree) may do so. A handler that only inspects events as they
/// arrive, like [`NullHandler`] or a tag counter, can ignore `'a` entirely.
///
/// A default no-op body is provided for every method, so a consumer
/// overrides only the events it cares about.
///
/// Event ordering: `start_document` fires exactly once, first.
/// `end_document` fires exactly once, last. For every element:
/// `start_element` then zero or more `attribute` calls then exactly one
/// `end_attributes`. If `end_attributes` reported `empty = true`, no
/// further events for that element follow (self-closing elements do not
/// get a matching `end_element`). Otherwise zero or more child events
/// follow, then `end_element`.
#[allow(unused_variables)]
pub trait Handler<'a> {
    /// Fired exactly once, before any other event.
    fn start_document(&mut self) {}

    /// Fired exactly once, after every other event.
    fn end_document(&mut self) {}

    /// An element's opening tag, before its attributes are known.
    fn start_element(&mut self, name: &'a [u8]) {}

    /// One attribute of the most recently started element.
    fn attribute(&mut self, name: &'a [u8], value: &'a [u8]) {}

    /// Fired once per element, after its attributes. `empty` is `true`
    /// for `<x/>`, in which case this element is already closed and no
    /// `end_element` will follow.
    fn end_attributes(&mut self, empty: bool) {}

    /// An element's closing tag. Not fired for self-closing elements.
    fn end_element(&mut self, name: &'a [u8]) {}

    /// A run of character data.
    fn text(&mut self, value: &'a [u8]) {}

    /// The content of a `<![CDATA[ ... ]]>` section, markers excluded.
    fn cdata(&mut self, value: &'a [u8]) {}

    /// The content of a `<!-- ... -->` comment, markers excluded.
    fn comment(&mut self, value: &'a [u8]) {}

    /// A `<?target value?>` processing instruction.
    fn processing_instruction(&mut self, target: &'a [u8], value: &'a [u8]) {}

    /// A `<!DOCTYPE ...>` declaration was encountered. The parser does
    /// not decode DOCTYPE subset content (see `parser.rs` for the
    /// fail-fast discipline chosen for the rest of the declaration); this
    /// method exists for handler implementations that build documents by
    /// other means and want to record that a doctype was present.
    fn doctype(&mut self) {}
}

/// A [`Handler`] that discards every event. Useful as a placeholder or
/// for benchmarking raw scan throughput.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHandler;

impl<'a> Handler<'a> for NullHandler {}
