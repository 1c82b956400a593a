//! Generering av GEDCOM 5.5-text från poster

use super::line::{split_at_char_boundary, Line, MAX_LINE_LENGTH};
use super::parser::GedcomDocument;
use super::record::{Record, CONT_PLACEHOLDER};

/// GEDCOM-generator
pub struct GedcomWriter;

impl GedcomWriter {
    /// Rendera ett helt dokument: HEAD, därefter individ-, familje- och
    /// källposter, avslutat med TRLR
    pub fn render_document(doc: &GedcomDocument) -> String {
        let mut out = String::new();

        out.push_str("0 HEAD\n");
        out.push_str("1 SOUR gedkonv\n");
        out.push_str(&format!("2 VERS {}\n", env!("CARGO_PKG_VERSION")));
        out.push_str("1 GEDC\n");
        out.push_str("2 VERS 5.5\n");
        out.push_str("1 CHAR UTF-8\n");

        for record in doc
            .individuals
            .iter()
            .chain(&doc.families)
            .chain(&doc.sources)
        {
            Self::render_record(record, &mut out);
        }

        out.push_str("0 TRLR\n");
        out
    }

    fn render_record(record: &Record, out: &mut String) {
        out.push_str(&format!("0 {} {}\n", record.id, record.kind.tag()));
        for line in &record.lines {
            for physical in Self::split_line(line) {
                out.push_str(&physical);
                out.push('\n');
            }
        }
    }

    /// Dela upp en logisk rad i fysiska rader. `<<CONT>>`-platshållare blir
    /// CONT-rader och värden som inte ryms inom radlängden delas upp med
    /// CONC-fortsättningar. Fortsättningsrader ligger en nivå under raden de
    /// fortsätter.
    fn split_line(line: &Line) -> Vec<String> {
        let mut out = Vec::new();

        let cont_depth = line.depth + 1;
        let mut depth = line.depth;
        let mut tag = line.tag.clone();
        let mut value = match &line.value {
            Some(v) => v.clone(),
            None => {
                out.push(format!("{} {}", line.depth, line.tag));
                return out;
            }
        };

        loop {
            let prefix_len = depth.to_string().len() + tag.chars().count() + 2;
            let budget = MAX_LINE_LENGTH.saturating_sub(prefix_len);

            match value.find(CONT_PLACEHOLDER) {
                Some(idx) if value[..idx].chars().count() <= budget => {
                    let head = &value[..idx];
                    let rest = value[idx + CONT_PLACEHOLDER.len()..].to_string();
                    out.push(render_line(depth, &tag, head));
                    depth = cont_depth;
                    tag = "CONT".to_string();
                    value = rest;
                }
                _ => {
                    if value.chars().count() <= budget || budget == 0 {
                        out.push(render_line(depth, &tag, &value));
                        break;
                    }
                    let (head, rest) = split_at_char_boundary(&value, budget);
                    out.push(render_line(depth, &tag, head));
                    let rest = rest.to_string();
                    depth = cont_depth;
                    tag = "CONC".to_string();
                    value = rest;
                }
            }
        }

        out
    }
}

fn render_line(depth: u32, tag: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{} {}", depth, tag)
    } else {
        format!("{} {} {}", depth, tag, value)
    }
}
