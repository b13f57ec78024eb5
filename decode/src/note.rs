//! Structured view of a DFT message, optionally filtered by patient name.
//!
//! Unlike the report tables, positions here follow HL7 v2 field numbering
//! (FT1-4 transaction date, FT1-12 amount, FT1-25 procedure code).

use hl7_segment::{parse_message, Halt, Segment, SegmentHandler, SegmentKind};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::transaction::parse_amount;

/// Default minimum similarity for [`PatientQuery`]
pub const DEFAULT_MATCH_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatientNote {
    pub id: String,
    pub name: String,
    pub dob: String,
    pub sex: String,
    pub race: String,
    pub address: String,
    pub phone: String,
    pub primary_language: String,
    pub ethnicity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisitNote {
    pub patient_class: String,
    pub prior_patient_location: String,
    pub attending_doctor_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChargeNote {
    pub transaction_id: String,
    pub transaction_date: String,
    pub transaction_type: String,
    pub transaction_code: String,
    pub transaction_description: String,
    pub transaction_description_2: String,
    pub transaction_amount: Option<Decimal>,
    pub icd_codes: Vec<String>,
    pub cpt_code: String,
    pub cpt_code_modifier: String,
}

/// Patient, visit and charge lines of one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DftNote {
    pub patient: Option<PatientNote>,
    pub visit: Option<VisitNote>,
    pub charges: Vec<ChargeNote>,
}

/// Lowercase alphanumeric tokens, sorted and joined by single spaces
fn sort_tokens(text: &str) -> String {
    let normalized: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Word-order independent similarity of two names, 0 to 100
///
/// `MARGARET BURROWS` and `BURROWS^MARGARET^^` score 100.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let (a, b) = (sort_tokens(a), sort_tokens(b));
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (strsim::normalized_levenshtein(&a, &b) * 100.0).round() as u8
}

/// Patient name to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientQuery {
    name: String,
    threshold: u8,
}

impl PatientQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(self, threshold: u8) -> Self {
        Self { threshold, ..self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self, candidate: &str) -> u8 {
        token_sort_ratio(&self.name, candidate)
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.score(candidate) >= self.threshold
    }
}

/// Segment handler building a [`DftNote`]
///
/// With a query, the first PID segment decides: a name scoring below the
/// threshold halts the walk.
#[derive(Debug)]
pub struct NoteCollector<'q> {
    query: Option<&'q PatientQuery>,
    patient_checked: bool,
    note: DftNote,
    icd_pattern: Option<(u8, Regex)>,
}

impl<'q> NoteCollector<'q> {
    pub fn new(query: Option<&'q PatientQuery>) -> Self {
        Self {
            query,
            patient_checked: false,
            note: DftNote::default(),
            icd_pattern: None,
        }
    }

    pub fn finish(self) -> DftNote {
        self.note
    }

    fn text(segment: &Segment<'_>, position: usize) -> String {
        segment
            .field(position)
            .map(|f| String::from_utf8_lossy(f.as_bytes()).into_owned())
            .unwrap_or_default()
    }

    fn collect_patient(&mut self, segment: &Segment<'_>) -> Result<(), Halt> {
        let name = Self::text(segment, 5);

        if let Some(query) = self.query {
            if !self.patient_checked {
                self.patient_checked = true;
                let score = query.score(&name);
                debug!(query = query.name(), candidate = %name, score, "matching patient");
                if score < query.threshold {
                    return Err(Halt::new("patient name does not match query"));
                }
            }
        }

        self.note.patient = Some(PatientNote {
            id: Self::text(segment, 1),
            name,
            dob: Self::text(segment, 7),
            sex: Self::text(segment, 8),
            race: Self::text(segment, 10),
            address: Self::text(segment, 11),
            phone: Self::text(segment, 13),
            primary_language: Self::text(segment, 15),
            ethnicity: Self::text(segment, 22),
        });
        Ok(())
    }

    fn collect_visit(&mut self, segment: &Segment<'_>) {
        self.note.visit = Some(VisitNote {
            patient_class: Self::text(segment, 1),
            prior_patient_location: Self::text(segment, 6),
            attending_doctor_id: Self::text(segment, 7),
        });
    }

    /// Code components immediately followed by `^^I10`
    fn icd_codes(&mut self, segment: &Segment<'_>, text: &str) -> Vec<String> {
        let component = segment.delimiters.component;

        if self.icd_pattern.as_ref().map(|(c, _)| *c) != Some(component) {
            let separator = regex::escape(&char::from(component).to_string());
            let pattern = format!("([A-Z0-9.]+){separator}{separator}I10");
            match Regex::new(&pattern) {
                Ok(regex) => self.icd_pattern = Some((component, regex)),
                Err(e) => {
                    warn!(error = %e, "invalid ICD-10 pattern");
                    return Vec::new();
                }
            }
        }

        self.icd_pattern
            .as_ref()
            .map(|(_, regex)| {
                regex
                    .captures_iter(text)
                    .map(|caps| caps[1].to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn collect_charge(&mut self, segment: &Segment<'_>) {
        let component = char::from(segment.delimiters.component);
        let diagnoses = Self::text(segment, 19);

        let charge = ChargeNote {
            transaction_id: Self::text(segment, 2),
            transaction_date: Self::text(segment, 4),
            transaction_type: Self::text(segment, 6),
            transaction_code: Self::text(segment, 7),
            transaction_description: Self::text(segment, 8),
            transaction_description_2: Self::text(segment, 9),
            transaction_amount: parse_amount(&Self::text(segment, 12)),
            icd_codes: self.icd_codes(segment, &diagnoses),
            cpt_code: Self::text(segment, 25),
            cpt_code_modifier: Self::text(segment, 26)
                .trim_matches(component)
                .to_string(),
        };
        self.note.charges.push(charge);
    }
}

impl SegmentHandler for NoteCollector<'_> {
    fn handle(&mut self, segment: &Segment<'_>) -> Result<(), Halt> {
        match segment.kind() {
            SegmentKind::Pid => self.collect_patient(segment)?,
            SegmentKind::Pv1 => self.collect_visit(segment),
            SegmentKind::Ft1 => self.collect_charge(segment),
            _ => {}
        }
        Ok(())
    }
}

/// Build a [`DftNote`], or `None` when the patient does not match `query`
pub fn parse_note(raw: &[u8], query: Option<&PatientQuery>) -> Option<DftNote> {
    let mut collector = NoteCollector::new(query);
    match parse_message(raw, &mut collector) {
        Ok(_) => Some(collector.finish()),
        Err(halt) => {
            debug!(reason = %halt, "note skipped");
            None
        }
    }
}
