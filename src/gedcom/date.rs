//! GEDCOM-datum med stöd för modifierare

use chrono::NaiveDate;

/// Datummodifierare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateModifier {
    /// Omkring (ABT)
    About,
    /// Före (BEF)
    Before,
    /// Efter (AFT)
    After,
    /// Uppskattat (EST)
    Estimated,
    /// Beräknat (CAL)
    Calculated,
    /// Mellan (BET ... AND ...)
    Between,
    /// Från (FROM)
    From,
    /// Till (TO)
    To,
}

impl DateModifier {
    pub fn display(&self) -> &'static str {
        match self {
            Self::About => "ca",
            Self::Before => "före",
            Self::After => "efter",
            Self::Estimated => "uppsk.",
            Self::Calculated => "ber.",
            Self::Between => "mellan",
            Self::From => "från",
            Self::To => "till",
        }
    }
}

/// Kända modifierarprefix, med och utan punkt
const MODIFIER_PREFIXES: &[(&str, DateModifier)] = &[
    ("ABT.", DateModifier::About),
    ("ABT", DateModifier::About),
    ("ABOUT", DateModifier::About),
    ("BEF.", DateModifier::Before),
    ("BEF", DateModifier::Before),
    ("BEFORE", DateModifier::Before),
    ("AFT.", DateModifier::After),
    ("AFT", DateModifier::After),
    ("AFTER", DateModifier::After),
    ("EST.", DateModifier::Estimated),
    ("EST", DateModifier::Estimated),
    ("CAL.", DateModifier::Calculated),
    ("CAL", DateModifier::Calculated),
    ("BET", DateModifier::Between),
    ("FROM", DateModifier::From),
    ("TO", DateModifier::To),
];

/// Ett datumvärde ur en GEDCOM-fil
#[derive(Debug, Clone)]
pub struct GedcomDate {
    /// Modifierare (ABT, BEF, AFT, etc.)
    pub modifier: Option<DateModifier>,
    /// Originalsträng
    pub original: String,
    /// Parsat datum (om möjligt)
    pub date: Option<NaiveDate>,
}

impl GedcomDate {
    /// Parsa en GEDCOM-datumsträng
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let (modifier, rest) = Self::extract_modifier(s);
        Self {
            modifier,
            original: s.to_string(),
            date: Self::parse_date_string(rest),
        }
    }

    /// Om värdet går att tolka som datumangivelse. Intervallformer
    /// (BET/FROM/TO) räknas som tolkbara även när resten inte är ett
    /// enskilt datum.
    pub fn is_interpretable(&self) -> bool {
        self.date.is_some()
            || matches!(
                self.modifier,
                Some(DateModifier::Between) | Some(DateModifier::From) | Some(DateModifier::To)
            )
    }

    /// Formatera för visning
    pub fn display(&self) -> String {
        let modifier_str = self
            .modifier
            .map(|m| format!("{} ", m.display()))
            .unwrap_or_default();

        match self.date {
            Some(date) => format!("{}{}", modifier_str, date.format("%Y-%m-%d")),
            None => self.original.clone(),
        }
    }

    fn extract_modifier(s: &str) -> (Option<DateModifier>, &str) {
        for (prefix, modifier) in MODIFIER_PREFIXES {
            let n = prefix.len();
            if s.len() > n
                && s.is_char_boundary(n)
                && s[..n].eq_ignore_ascii_case(prefix)
                && s[n..].starts_with(' ')
            {
                return (Some(*modifier), s[n..].trim_start());
            }
        }
        (None, s)
    }

    fn parse_date_string(s: &str) -> Option<NaiveDate> {
        let s = s.trim();

        // ISO-format: 1850-05-23
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date);
        }

        // Svenskt kortformat: 23/5 1850
        if let Ok(date) = NaiveDate::parse_from_str(s, "%d/%m %Y") {
            return Some(date);
        }

        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.len() {
            // "1850"
            1 => {
                let year = parts[0].parse::<i32>().ok()?;
                if !(1000..=2100).contains(&year) {
                    return None;
                }
                NaiveDate::from_ymd_opt(year, 1, 1)
            }
            // "MAY 1850" eller "1850 MAY"
            2 => {
                let (month_str, year_str) = if parts[0].parse::<i32>().is_ok() {
                    (parts[1], parts[0])
                } else {
                    (parts[0], parts[1])
                };
                let month = Self::parse_month(month_str)?;
                let year = year_str.parse::<i32>().ok()?;
                NaiveDate::from_ymd_opt(year, month, 1)
            }
            // "23 MAY 1850"
            3 => {
                let day = parts[0].parse::<u32>().ok()?;
                let month = Self::parse_month(parts[1])?;
                let year = parts[2].parse::<i32>().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            }
            _ => None,
        }
    }

    fn parse_month(s: &str) -> Option<u32> {
        match s.to_uppercase().as_str() {
            "JAN" | "JANUARY" => Some(1),
            "FEB" | "FEBRUARY" => Some(2),
            "MAR" | "MARCH" => Some(3),
            "APR" | "APRIL" => Some(4),
            "MAY" => Some(5),
            "JUN" | "JUNE" => Some(6),
            "JUL" | "JULY" => Some(7),
            "AUG" | "AUGUST" => Some(8),
            "SEP" | "SEPTEMBER" => Some(9),
            "OCT" | "OCTOBER" => Some(10),
            "NOV" | "NOVEMBER" => Some(11),
            "DEC" | "DECEMBER" => Some(12),
            _ => None,
        }
    }
}
