/// HL7 delimiters, declared by the MSH header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Field separator (MSH position 3, typically '|')
    pub field: u8,
    /// Component separator (first encoding character, typically '^')
    pub component: u8,
    /// Repetition separator (second encoding character, typically '~')
    pub repetition: u8,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: b'|',
            component: b'^',
            repetition: b'~',
        }
    }
}

impl Delimiters {
    /// Read delimiters from an `MSH` line
    ///
    /// `MSH|^~\&|...` declares `|` as field separator and `^~\&` as encoding
    /// characters. Returns `None` when the line is not an MSH header or the
    /// declared characters are unusable (line breaks, alphanumerics, clashes).
    pub fn from_msh(line: &[u8]) -> Option<Self> {
        if line.len() < 5 || &line[..3] != b"MSH" {
            return None;
        }

        let field = line[3];
        let encoding = &line[4..];
        let encoding = &encoding[..encoding
            .iter()
            .position(|&b| b == field)
            .unwrap_or(encoding.len())];

        let component = *encoding.first()?;
        let repetition = encoding
            .get(1)
            .copied()
            .unwrap_or(Self::default().repetition);

        let delimiters = Self {
            field,
            component,
            repetition,
        };

        delimiters.is_usable().then_some(delimiters)
    }

    fn is_usable(&self) -> bool {
        let chars = [self.field, self.component, self.repetition];

        let distinct = chars[0] != chars[1] && chars[0] != chars[2] && chars[1] != chars[2];

        distinct && chars.iter().all(|b| b.is_ascii_punctuation())
    }
}
