//! Value formatting shared by the report tables.
//!
//! Every helper works on already UTF-8 checked text and takes the message
//! delimiters so that messages declaring their own encoding characters are
//! split the same way the tokenizer splits them.

use hl7_segment::Delimiters;

/// Descriptions longer than this many characters are cut
pub const MAX_DESCRIPTION_LEN: usize = 80;

/// Cut long free text to [`MAX_DESCRIPTION_LEN`] characters plus `...`
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(MAX_DESCRIPTION_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Keep the code (component 0) of every repetition, joined by `, `
///
/// `E11.9^^I10~I10.9^^I10` becomes `E11.9, I10.9`.
pub fn format_diagnosis_codes(text: &str, delimiters: &Delimiters) -> String {
    let component = char::from(delimiters.component);

    text.split(char::from(delimiters.repetition))
        .map(|repetition| repetition.split(component).next().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `YYYYMMDD` as `MM/DD/YYYY`; anything that is not eight digits is kept
pub fn format_birth_date(text: &str) -> String {
    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}/{}/{}", &text[4..6], &text[6..8], &text[0..4])
    } else {
        text.to_string()
    }
}

pub fn gender_label(code: &str) -> &str {
    match code {
        "M" => "Male",
        "F" => "Female",
        other => other,
    }
}

pub fn marital_status_label(code: &str) -> &str {
    match code {
        "M" => "Married",
        "S" => "Single",
        "D" => "Divorced",
        "W" => "Widowed",
        other => other,
    }
}

/// `Last^First^...` as `Last, First`; `None` without at least two components
pub fn format_person_name(text: &str, delimiters: &Delimiters) -> Option<String> {
    let mut components = text.split(char::from(delimiters.component));
    let last = components.next()?;
    let first = components.next()?;
    Some(format!("{last}, {first}"))
}

/// Non-empty values among the first five address components
pub fn format_address(text: &str, delimiters: &Delimiters) -> Option<String> {
    let parts: Vec<&str> = text
        .split(char::from(delimiters.component))
        .take(5)
        .filter(|part| !part.is_empty())
        .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Street, state and zip (components 0, 3 and 4) of an address
///
/// Requires at least four components; a missing zip renders as empty.
pub fn format_short_address(text: &str, delimiters: &Delimiters) -> Option<String> {
    let parts: Vec<&str> = text.split(char::from(delimiters.component)).collect();
    if parts.len() < 4 {
        return None;
    }

    Some(format!(
        "{}, {}, {}",
        parts[0],
        parts[3],
        parts.get(4).copied().unwrap_or_default()
    ))
}
