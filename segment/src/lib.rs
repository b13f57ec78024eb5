#![no_std]

//! HL7 v2 Segment Tokenizer
//!
//! A no_std, zero-copy tokenizer for pipe-delimited HL7 v2 messages.
//! The parser walks a message buffer one segment (line) at a time and hands
//! each borrowed [`Segment`] to a [`SegmentHandler`].
//!
//! # Design Philosophy
//! - Zero-copy: segments, fields and components all borrow the input buffer
//! - Positional: `field(n)` uses split indices, field 0 is the segment type
//! - Total: a missing field is `None`, never an error
//! - Handlers decide what matters; only a handler can stop the walk ([`Halt`])
//!
//! # Usage
//! ```ignore
//! let mut parser = MessageParser::init();
//! let mut handler = MyHandler::new();
//!
//! let segments = parser.parse_segments(message.as_bytes(), &mut handler)?;
//! ```

mod delimiters;
mod kind;

pub use delimiters::Delimiters;
pub use kind::SegmentKind;

/// Parsed HL7 segment with zero-copy field references
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    /// Segment type (field 0, e.g. "MSH", "PID", "FT1")
    pub id: &'a [u8],
    /// Raw segment line without its terminator
    raw: &'a [u8],
    /// Delimiter configuration
    pub delimiters: Delimiters,
}

impl<'a> Segment<'a> {
    /// Create a segment from one raw line
    pub fn new(raw: &'a [u8], delimiters: Delimiters) -> Self {
        let id_end = raw
            .iter()
            .position(|&b| b == delimiters.field)
            .unwrap_or(raw.len());

        Self {
            id: &raw[..id_end],
            raw,
            delimiters,
        }
    }

    /// Get segment type as string (if valid UTF-8)
    #[inline]
    pub fn id_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.id).ok()
    }

    /// Classify the segment type
    #[inline]
    pub fn kind(&self) -> SegmentKind<'a> {
        SegmentKind::from_id(self.id)
    }

    /// Raw bytes of the whole segment line
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    /// Iterate over all fields, starting with the segment type
    pub fn fields(&self) -> Split<'a> {
        Split::new(self.raw, self.delimiters.field, self.delimiters)
    }

    /// Get field by split position
    ///
    /// - `field(0)` returns the segment type
    /// - `field(n)` returns the n-th pipe-delimited value after it
    ///
    /// A position beyond the end of the segment is `None`.
    #[inline]
    pub fn field(&self, position: usize) -> Option<Field<'a>> {
        self.fields().nth(position)
    }

    /// Number of fields including the segment type
    ///
    /// `PID|1` has two fields, `PID|1|` has three.
    pub fn field_count(&self) -> usize {
        self.fields().count()
    }
}

/// A field, component or repetition value borrowed from the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    data: &'a [u8],
    delimiters: Delimiters,
}

impl<'a> Field<'a> {
    #[inline]
    pub fn new(data: &'a [u8], delimiters: Delimiters) -> Self {
        Self { data, delimiters }
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get value as string (if valid UTF-8)
    #[inline]
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.data).ok()
    }

    /// Split by the component separator (`^`)
    pub fn components(&self) -> Split<'a> {
        Split::new(self.data, self.delimiters.component, self.delimiters)
    }

    /// Get component by position (0-based)
    #[inline]
    pub fn component(&self, position: usize) -> Option<Field<'a>> {
        self.components().nth(position)
    }

    /// Split by the repetition separator (`~`)
    pub fn repetitions(&self) -> Split<'a> {
        Split::new(self.data, self.delimiters.repetition, self.delimiters)
    }
}

/// Iterator over separator-delimited values
///
/// Always yields at least one value: an empty input yields one empty field,
/// and a trailing separator yields a trailing empty field.
#[derive(Debug, Clone)]
pub struct Split<'a> {
    data: &'a [u8],
    separator: u8,
    delimiters: Delimiters,
    finished: bool,
}

impl<'a> Split<'a> {
    fn new(data: &'a [u8], separator: u8, delimiters: Delimiters) -> Self {
        Self {
            data,
            separator,
            delimiters,
            finished: false,
        }
    }
}

impl<'a> Iterator for Split<'a> {
    type Item = Field<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.data.iter().position(|&b| b == self.separator) {
            Some(idx) => {
                let value = &self.data[..idx];
                self.data = &self.data[idx + 1..];
                Some(Field::new(value, self.delimiters))
            }
            None => {
                self.finished = true;
                Some(Field::new(self.data, self.delimiters))
            }
        }
    }
}

/// Trait for handling parsed segments
///
/// Implement this trait to process segments as they are parsed.
/// The segment lifetime is tied to the buffer, so all processing
/// must complete before the buffer is dropped.
///
/// Handlers should absorb malformed fields themselves. Only return
/// `Err(Halt)` when the rest of the message is of no interest.
pub trait SegmentHandler {
    /// Handle one non-empty segment, in document order
    fn handle(&mut self, segment: &Segment<'_>) -> Result<(), Halt>;
}

/// Request from a handler to stop walking the message
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Halt {
    /// Human-readable reason
    pub message: &'static str,
}

impl Halt {
    #[inline]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// HL7 v2 message parser
///
/// Segments are separated by any run of `\r` and `\n`. The first segment
/// decides the delimiters: an `MSH` header declares its own, anything else
/// falls back to [`Delimiters::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageParser {
    /// Waiting for the first segment
    Initial,

    /// Processing segments with known delimiters
    Processing(Delimiters),
}

impl MessageParser {
    pub fn init() -> Self {
        Self::Initial
    }

    /// Start with fixed delimiters, ignoring whatever `MSH` declares
    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self::Processing(delimiters)
    }

    /// Delimiters in use, once known
    pub fn delimiters(&self) -> Option<Delimiters> {
        match self {
            MessageParser::Initial => None,
            MessageParser::Processing(delimiters) => Some(*delimiters),
        }
    }

    /// Forget the delimiters so the next message can declare its own
    pub fn reset(&mut self) {
        *self = Self::Initial;
    }

    /// Advance the buffer past any `\r` / `\n` bytes
    #[inline]
    fn skip_line_breaks(buffer: &mut &[u8]) {
        let skipped = buffer
            .iter()
            .take_while(|&&b| b == b'\r' || b == b'\n')
            .count();
        *buffer = &buffer[skipped..];
    }

    /// Walk every segment in the buffer and invoke the handler for each.
    ///
    /// Blank and whitespace-only lines are skipped.
    /// Returns the number of segments handed to the handler.
    ///
    /// # Errors
    ///
    /// Returns the handler's [`Halt`]; segments before it were handled.
    pub fn parse_segments<H: SegmentHandler>(
        &mut self,
        mut buffer: &[u8],
        handler: &mut H,
    ) -> Result<usize, Halt> {
        let mut handled = 0;

        Self::skip_line_breaks(&mut buffer);

        while !buffer.is_empty() {
            let line_end = buffer
                .iter()
                .position(|&b| b == b'\r' || b == b'\n')
                .unwrap_or(buffer.len());

            let line = &buffer[..line_end];
            buffer = &buffer[line_end..];
            Self::skip_line_breaks(&mut buffer);

            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            let delimiters = match self {
                MessageParser::Initial => {
                    let delimiters = Delimiters::from_msh(line).unwrap_or_default();
                    *self = MessageParser::Processing(delimiters);
                    delimiters
                }
                MessageParser::Processing(delimiters) => *delimiters,
            };

            handler.handle(&Segment::new(line, delimiters))?;
            handled += 1;
        }

        Ok(handled)
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::init()
    }
}

/// Parse one whole message with a fresh parser
///
/// # Errors
///
/// Returns the handler's [`Halt`].
pub fn parse_message<H: SegmentHandler>(buffer: &[u8], handler: &mut H) -> Result<usize, Halt> {
    MessageParser::init().parse_segments(buffer, handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestHandler {
        segments: usize,
    }

    impl TestHandler {
        fn new() -> Self {
            Self { segments: 0 }
        }
    }

    impl SegmentHandler for TestHandler {
        fn handle(&mut self, _segment: &Segment<'_>) -> Result<(), Halt> {
            self.segments += 1;
            Ok(())
        }
    }

    #[test]
    fn test_parse_counts_segments() {
        let mut parser = MessageParser::init();
        let mut handler = TestHandler::new();

        let data = b"MSH|^~\\&|APP|FAC\nPID|1|123\nFT1|1|T1|20240101";

        let result = parser.parse_segments(data, &mut handler);
        assert_eq!(result, Ok(3));
        assert_eq!(handler.segments, 3);
        assert_eq!(parser.delimiters(), Some(Delimiters::default()));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut handler = TestHandler::new();

        let data = b"\r\n\nPID|1\n\n   \r\nFT1|1\r\n\r\n";

        assert_eq!(parse_message(data, &mut handler), Ok(2));
    }

    #[test]
    fn test_field_positions() {
        let segment = Segment::new(b"PID|1|123||Doe^Jane", Delimiters::default());

        assert_eq!(segment.id, b"PID");
        assert_eq!(segment.field_count(), 5);
        assert_eq!(segment.field(0).map(|f| f.as_bytes()), Some(&b"PID"[..]));
        assert_eq!(segment.field(2).and_then(|f| f.as_str()), Some("123"));
        assert!(segment.field(3).is_some_and(|f| f.is_empty()));
        assert!(segment.field(5).is_none());
    }

    #[test]
    fn test_trailing_separator_yields_empty_field() {
        let segment = Segment::new(b"PID|", Delimiters::default());
        assert_eq!(segment.field_count(), 2);

        let bare = Segment::new(b"PID", Delimiters::default());
        assert_eq!(bare.field_count(), 1);
    }

    #[test]
    fn test_component_split() {
        let field = Field::new(b"Doe^Jane^^^", Delimiters::default());
        let components: alloc::vec::Vec<_> = field.components().map(|c| c.as_bytes()).collect();
        assert_eq!(components.len(), 5);
        assert_eq!(components[0], b"Doe");
        assert_eq!(components[1], b"Jane");
        assert_eq!(components[4], b"");
    }

    #[test]
    fn test_repetition_split() {
        let field = Field::new(b"E11.9^^I10~I10.9^^I10", Delimiters::default());
        let codes: alloc::vec::Vec<_> = field
            .repetitions()
            .filter_map(|rep| rep.component(0))
            .map(|c| c.as_bytes())
            .collect();
        assert_eq!(codes, [&b"E11.9"[..], &b"I10.9"[..]]);
    }

    #[test]
    fn test_invalid_utf8_field() {
        let field = Field::new(&[0xFF, 0xFE], Delimiters::default());
        assert_eq!(field.as_str(), None);
        assert!(!field.is_empty());
    }
}

// Test allocator for unit tests
#[cfg(test)]
extern crate alloc;
