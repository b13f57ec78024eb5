//! Field layouts of the segment types the report knows about.
//!
//! Positions are split indices (field 0 is the segment type). Adding a field
//! to the report means adding a row here.

use hl7_segment::{Segment, SegmentKind};

use crate::error::{DecodeError, Result};
use crate::format;

/// How a field value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// As is, even when empty
    Verbatim,
    /// As is, skipped when empty
    NonEmpty,
    /// `Last, First`, skipped with fewer than two components
    PersonName,
    /// `MM/DD/YYYY`, skipped when empty
    BirthDate,
    Gender,
    /// Non-empty parts of the first five components, skipped when none
    Address,
    /// Components 0, 3 and 4, skipped with fewer than four components
    ShortAddress,
    /// Skipped when empty
    MaritalStatus,
    LongText,
    /// Long text skipped when empty or equal to the field at `primary`
    AltText { primary: usize },
    Amount,
    /// Skipped when empty
    DiagnosisCodes,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldRule {
    pub position: usize,
    pub label: &'static str,
    pub format: Format,
}

const fn rule(position: usize, label: &'static str, format: Format) -> FieldRule {
    FieldRule {
        position,
        label,
        format,
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Title {
    Fixed(&'static str),
    /// Followed by ` - Entry <set id>:`
    Entry(&'static str),
}

#[derive(Debug)]
pub(crate) struct Layout {
    pub title: Title,
    pub rules: &'static [FieldRule],
}

impl Layout {
    pub fn title(&self, segment: &Segment<'_>) -> String {
        match self.title {
            Title::Fixed(title) => title.to_string(),
            Title::Entry(name) => {
                let entry = segment
                    .field(1)
                    .map(|f| String::from_utf8_lossy(f.as_bytes()).into_owned())
                    .unwrap_or_else(|| "Unknown".to_string());
                format!("{name} - Entry {entry}:")
            }
        }
    }
}

use Format::*;

static MSH: Layout = Layout {
    title: Title::Fixed("Message Header (MSH):"),
    rules: &[
        rule(3, "Sending Application", Verbatim),
        rule(4, "Sending Facility", Verbatim),
        rule(5, "Receiving Application", Verbatim),
        rule(6, "Receiving Facility", Verbatim),
        rule(7, "Message Date/Time", Verbatim),
        rule(8, "Security", Verbatim),
        rule(9, "Message Type", Verbatim),
        rule(10, "Message Control ID", Verbatim),
        rule(11, "Processing ID", Verbatim),
        rule(12, "Version ID", Verbatim),
    ],
};

static EVN: Layout = Layout {
    title: Title::Fixed("Event Type (EVN):"),
    rules: &[
        rule(1, "Event Type Code", Verbatim),
        rule(2, "Event Date/Time", Verbatim),
        rule(3, "Event Reason Code", Verbatim),
    ],
};

static PID: Layout = Layout {
    title: Title::Fixed("Patient Information (PID):"),
    rules: &[
        rule(1, "Set ID", Verbatim),
        rule(2, "Patient ID", Verbatim),
        rule(3, "Patient ID (Alt)", Verbatim),
        rule(5, "Patient Name", PersonName),
        rule(7, "Date of Birth", BirthDate),
        rule(8, "Gender", Gender),
        rule(11, "Address", Address),
        rule(13, "Phone", NonEmpty),
        rule(15, "Primary Language", NonEmpty),
        rule(16, "Marital Status", MaritalStatus),
        rule(40, "Home Phone", NonEmpty),
        rule(41, "Business Phone", NonEmpty),
        rule(42, "Attending Physician", NonEmpty),
        rule(43, "Hospital Location", NonEmpty),
    ],
};

static PV1: Layout = Layout {
    title: Title::Fixed("Patient Visit Information (PV1):"),
    rules: &[
        rule(1, "Set ID", Verbatim),
        rule(2, "Patient Class", Verbatim),
        rule(3, "Assigned Location", Verbatim),
        rule(4, "Admission Type", Verbatim),
        rule(7, "Attending Doctor", Verbatim),
        rule(8, "Referring Doctor", Verbatim),
        rule(19, "Visit Number", Verbatim),
        rule(44, "Admit Date/Time", Verbatim),
    ],
};

static FT1: Layout = Layout {
    title: Title::Entry("Financial Transaction (FT1)"),
    rules: &[
        rule(2, "Transaction ID", Verbatim),
        rule(3, "Transaction Date", Verbatim),
        rule(4, "Transaction Posting Date", Verbatim),
        rule(6, "Transaction Type", Verbatim),
        rule(7, "Transaction Code", Verbatim),
        rule(8, "Transaction Description", LongText),
        rule(9, "Transaction Description (Alt)", AltText { primary: 8 }),
        rule(11, "Transaction Amount", Amount),
        rule(12, "Transaction Quantity", Verbatim),
        rule(13, "Facility", Verbatim),
        rule(19, "Diagnosis Codes", DiagnosisCodes),
        rule(20, "Performed By", Verbatim),
        rule(24, "Procedure Code", Verbatim),
    ],
};

static PR1: Layout = Layout {
    title: Title::Fixed("Procedure (PR1):"),
    rules: &[
        rule(1, "Procedure ID", Verbatim),
        rule(2, "Procedure Code", Verbatim),
        rule(3, "Procedure Description", LongText),
        rule(4, "Procedure Date", Verbatim),
        rule(6, "Procedure Priority", Verbatim),
        rule(10, "Anesthesia Code", Verbatim),
        rule(16, "Diagnosis Code", Verbatim),
    ],
};

static DG1: Layout = Layout {
    title: Title::Entry("Diagnosis Information (DG1)"),
    rules: &[
        rule(2, "Diagnosis Code Method", Verbatim),
        rule(3, "Diagnosis Codes", DiagnosisCodes),
        rule(4, "Diagnosis Description", Verbatim),
        rule(5, "Diagnosis Date/Time", Verbatim),
        rule(6, "Diagnosis Type", Verbatim),
    ],
};

static GT1: Layout = Layout {
    title: Title::Fixed("Guarantor Information (GT1):"),
    rules: &[
        rule(2, "Guarantor Number", Verbatim),
        rule(3, "Guarantor Name", PersonName),
        rule(5, "Address", ShortAddress),
        rule(6, "Phone", Verbatim),
        rule(11, "SSN", Verbatim),
    ],
};

static IN1: Layout = Layout {
    title: Title::Fixed("Insurance Information (IN1):"),
    rules: &[
        rule(2, "Insurance Plan ID", Verbatim),
        rule(3, "Policy Number", Verbatim),
        rule(4, "Insurance Company", Verbatim),
        rule(5, "Address", ShortAddress),
        rule(16, "Insured's Name", PersonName),
        rule(18, "Insured's Date of Birth", Verbatim),
    ],
};

/// Layout for a known segment type; `None` means raw listing
pub(crate) fn layout(kind: SegmentKind<'_>) -> Option<&'static Layout> {
    match kind {
        SegmentKind::Msh => Some(&MSH),
        SegmentKind::Evn => Some(&EVN),
        SegmentKind::Pid => Some(&PID),
        SegmentKind::Pv1 => Some(&PV1),
        SegmentKind::Ft1 => Some(&FT1),
        SegmentKind::Pr1 => Some(&PR1),
        SegmentKind::Dg1 => Some(&DG1),
        SegmentKind::Gt1 => Some(&GT1),
        SegmentKind::In1 => Some(&IN1),
        SegmentKind::Other(_) => None,
    }
}

impl FieldRule {
    /// Report line for this rule, or `None` when the field is absent or skipped
    pub fn render(&self, segment: &Segment<'_>) -> Result<Option<String>> {
        let Some(field) = segment.field(self.position) else {
            return Ok(None);
        };
        let value = field.as_str().ok_or(DecodeError::InvalidUtf8 {
            position: self.position,
        })?;
        let delimiters = &segment.delimiters;

        let rendered = match self.format {
            Verbatim => Some(value.to_string()),
            NonEmpty => (!value.is_empty()).then(|| value.to_string()),
            PersonName => format::format_person_name(value, delimiters),
            BirthDate => (!value.is_empty()).then(|| format::format_birth_date(value)),
            Gender => Some(format::gender_label(value).to_string()),
            Address => format::format_address(value, delimiters),
            ShortAddress => format::format_short_address(value, delimiters),
            MaritalStatus => {
                (!value.is_empty()).then(|| format::marital_status_label(value).to_string())
            }
            LongText => Some(format::truncate_description(value)),
            AltText { primary } => {
                let same_as_primary = segment
                    .field(primary)
                    .is_some_and(|p| p.as_bytes() == value.as_bytes());
                (!value.is_empty() && !same_as_primary)
                    .then(|| format::truncate_description(value))
            }
            Amount => Some(format!("${value}")),
            DiagnosisCodes => {
                (!value.is_empty()).then(|| format::format_diagnosis_codes(value, delimiters))
            }
        };

        Ok(rendered.map(|text| format!("- {}: {}", self.label, text)))
    }
}
