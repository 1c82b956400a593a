//! En rad i en GEDCOM-fil

use std::fmt;

/// Största tillåtna radlängd i en GEDCOM-fil (i tecken)
pub const MAX_LINE_LENGTH: usize = 80;

/// En rad på formen `<nivå> <TAGG>[ <värde>]`
///
/// Taggar består av versaler, siffror och understreck. Leverantörsspecifika
/// taggar inleds med `_` (t.ex. `_UID`). Ett saknat värde är inte samma sak
/// som ett tomt: `1 BIRT` har inget värde alls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub depth: u32,
    pub tag: String,
    pub value: Option<String>,
}

impl Line {
    pub fn new(depth: u32, tag: impl Into<String>, value: Option<String>) -> Self {
        Self {
            depth,
            tag: tag.into(),
            value,
        }
    }

    /// Parsa en rad. Returnerar `None` om raden inte följer radformatet.
    pub fn parse(s: &str) -> Option<Line> {
        let mut parts = s.splitn(3, ' ');

        let depth = parts.next()?.parse::<u32>().ok()?;

        let tag = parts.next()?;
        if tag.is_empty() || !tag.chars().all(is_tag_char) {
            return None;
        }

        // Värdet behåller inre och avslutande blanksteg, men ett helt tomt
        // värde normaliseras till None
        let value = match parts.next() {
            None | Some("") => None,
            Some(v) => Some(v.to_string()),
        };

        Some(Line {
            depth,
            tag: tag.to_string(),
            value,
        })
    }

    /// Radens längd i tecken när den skrivs ut
    pub fn rendered_len(&self) -> usize {
        let value_len = self
            .value
            .as_ref()
            .map(|v| 1 + v.chars().count())
            .unwrap_or(0);
        self.depth.to_string().len() + 1 + self.tag.chars().count() + value_len
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} {}", self.depth, self.tag, value),
            None => write!(f, "{} {}", self.depth, self.tag),
        }
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

/// Dela en sträng vid en teckengräns så att första delen rymmer högst
/// `max_chars` tecken. Delar aldrig mitt i ett flerbyte-tecken.
pub(crate) fn split_at_char_boundary(s: &str, max_chars: usize) -> (&str, &str) {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}
