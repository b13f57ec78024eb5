use core::fmt;

/// Segment types with a known field layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind<'a> {
    /// Message header
    Msh,
    /// Event type
    Evn,
    /// Patient identification
    Pid,
    /// Patient visit
    Pv1,
    /// Financial transaction
    Ft1,
    /// Procedure
    Pr1,
    /// Diagnosis
    Dg1,
    /// Guarantor
    Gt1,
    /// Insurance
    In1,
    /// Anything else, including Z-segments
    Other(&'a [u8]),
}

impl<'a> SegmentKind<'a> {
    pub fn from_id(id: &'a [u8]) -> Self {
        match id {
            b"MSH" => Self::Msh,
            b"EVN" => Self::Evn,
            b"PID" => Self::Pid,
            b"PV1" => Self::Pv1,
            b"FT1" => Self::Ft1,
            b"PR1" => Self::Pr1,
            b"DG1" => Self::Dg1,
            b"GT1" => Self::Gt1,
            b"IN1" => Self::In1,
            other => Self::Other(other),
        }
    }

    /// Segment type tag as it appears in the message
    pub fn tag(&self) -> &'a [u8] {
        match self {
            Self::Msh => b"MSH",
            Self::Evn => b"EVN",
            Self::Pid => b"PID",
            Self::Pv1 => b"PV1",
            Self::Ft1 => b"FT1",
            Self::Pr1 => b"PR1",
            Self::Dg1 => b"DG1",
            Self::Gt1 => b"GT1",
            Self::In1 => b"IN1",
            Self::Other(tag) => *tag,
        }
    }
}

impl fmt::Display for SegmentKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match core::str::from_utf8(self.tag()) {
            Ok(tag) => f.write_str(tag),
            Err(_) => f.write_str("???"),
        }
    }
}
