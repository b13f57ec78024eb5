//! Human-readable report of every segment in a message.

use std::fmt;

use hl7_segment::{parse_message, Halt, Segment, SegmentHandler};
use tracing::{debug, warn};

use crate::layout;

/// One segment's worth of report output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Segment title, e.g. `Patient Information (PID):`
    pub title: String,
    /// `- Label: value` lines, possibly ending with an error line
    pub lines: Vec<String>,
}

impl Block {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }
}

/// Ordered report blocks, one per segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    blocks: Vec<Block>,
}

impl Report {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flatten into report lines: each block's title followed by its lines
    pub fn lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|block| std::iter::once(&block.title).chain(&block.lines))
            .cloned()
            .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", block.title)?;
            for line in &block.lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

/// Segment handler building a [`Report`]
///
/// Never halts. A segment that cannot be formatted gets an
/// `Error processing <TYPE> segment: ...` line and the walk goes on.
#[derive(Debug, Default)]
pub struct ReportDecoder {
    report: Report,
}

impl ReportDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Report {
        self.report
    }

    fn decode_segment(segment: &Segment<'_>) -> Block {
        let kind = segment.kind();

        let Some(layout) = layout::layout(kind) else {
            return Self::raw_block(segment);
        };

        let mut block = Block::new(layout.title(segment));
        for rule in layout.rules {
            match rule.render(segment) {
                Ok(Some(line)) => block.lines.push(line),
                Ok(None) => {}
                Err(e) => {
                    warn!(segment = %kind, error = %e, "failed to decode segment");
                    block
                        .lines
                        .push(format!("Error processing {kind} segment: {e}"));
                    break;
                }
            }
        }
        block
    }

    /// Generic listing for segment types without a layout
    fn raw_block(segment: &Segment<'_>) -> Block {
        let id = String::from_utf8_lossy(segment.id);
        let values: Vec<_> = segment
            .fields()
            .skip(1)
            .map(|f| String::from_utf8_lossy(f.as_bytes()))
            .collect();

        let mut block = Block::new(format!("{id} Segment:"));
        block.lines.push(format!("- Raw Data: {}", values.join(" | ")));
        block
    }
}

impl SegmentHandler for ReportDecoder {
    fn handle(&mut self, segment: &Segment<'_>) -> Result<(), Halt> {
        debug!(segment = %segment.kind(), fields = segment.field_count(), "decoding segment");
        self.report.blocks.push(Self::decode_segment(segment));
        Ok(())
    }
}

/// Decode a raw message into a [`Report`]
pub fn decode_report(raw: &[u8]) -> Report {
    let mut decoder = ReportDecoder::new();
    if let Err(halt) = parse_message(raw, &mut decoder) {
        warn!(reason = %halt, "report decoding stopped early");
    }
    decoder.finish()
}
