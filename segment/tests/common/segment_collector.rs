use std::fmt::Display;

use hl7_segment::{Delimiters, Halt, Segment, SegmentHandler};

/// Collects parsed segments for reconstruction and inspection
pub struct SegmentCollector {
    segments: Vec<SegmentData>,
    halt_on: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct SegmentData {
    pub id: Vec<u8>,
    pub fields: Vec<Vec<u8>>,
    pub delimiters: Delimiters,
}

impl SegmentCollector {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            halt_on: None,
        }
    }

    /// Collector that halts when it sees a segment of the given type
    pub fn halting_on(id: &str) -> Self {
        Self {
            segments: Vec::new(),
            halt_on: Some(id.as_bytes().to_vec()),
        }
    }

    /// Reconstruct the message from collected segments, one per line
    pub fn reconstruct(&self) -> String {
        self.segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn get_segment(&self, idx: usize) -> Option<&SegmentData> {
        self.segments.get(idx)
    }
}

impl SegmentHandler for SegmentCollector {
    fn handle(&mut self, segment: &Segment<'_>) -> Result<(), Halt> {
        if self.halt_on.as_deref() == Some(segment.id) {
            return Err(Halt::new("halt requested by collector"));
        }

        let fields: Vec<Vec<u8>> = segment.fields().map(|f| f.as_bytes().to_vec()).collect();

        self.segments.push(SegmentData {
            id: segment.id.to_vec(),
            fields,
            delimiters: segment.delimiters,
        });

        Ok(())
    }
}

impl Display for SegmentData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let separator = (self.delimiters.field as char).to_string();
        let fields: Vec<&str> = self
            .fields
            .iter()
            .map(|field| std::str::from_utf8(field).unwrap())
            .collect();
        write!(f, "{}", fields.join(&separator))
    }
}
