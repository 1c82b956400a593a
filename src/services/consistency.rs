//! Konsistenskontroller av parsad GEDCOM-data
//!
//! Dubblerade post-ID:n är hårda fel. Hänvisningar som pekar på poster som
//! saknas, och datum som inte går att tolka, samlas som varningar.

use std::collections::HashSet;

use crate::gedcom::{GedcomDate, GedcomDocument, Record};
use crate::utils::error::{ConvertError, ConvertResult};

/// Händelsetaggar vars DATE-rader kontrolleras. DATE-rader djupare ner
/// (t.ex. SOUR→DATA→DATE) är källintervall och lämnas ifred.
const EVENT_TAGS: &[&str] = &["BIRT", "DEAT", "MARR", "BAPM", "BURI"];

/// Kontrollera ett dokument. Returnerar varningslistan, eller fel vid
/// dubblerade ID:n.
pub fn verify(doc: &GedcomDocument) -> ConvertResult<Vec<String>> {
    let mut warnings = Vec::new();

    let individual_ids = collect_ids(&doc.individuals)?;
    let family_ids = collect_ids(&doc.families)?;
    collect_ids(&doc.sources)?;

    for record in &doc.individuals {
        for line in &record.lines {
            if line.depth != 1 {
                continue;
            }
            if line.tag == "FAMC" || line.tag == "FAMS" {
                if let Some(family_id) = &line.value {
                    if !family_ids.contains(family_id.as_str()) {
                        warnings.push(format!(
                            "Personen {} hänvisar till okänd familj {} ({})",
                            record.id, family_id, line.tag
                        ));
                    }
                }
            }
        }
        check_event_dates(record, &mut warnings);
    }

    for record in &doc.families {
        for line in &record.lines {
            if line.depth != 1 {
                continue;
            }
            if line.tag == "HUSB" || line.tag == "WIFE" || line.tag == "CHIL" {
                if let Some(person_id) = &line.value {
                    if !individual_ids.contains(person_id.as_str()) {
                        warnings.push(format!(
                            "Familjen {} hänvisar till okänd person {} ({})",
                            record.id, person_id, line.tag
                        ));
                    }
                }
            }
        }
        check_event_dates(record, &mut warnings);
    }

    Ok(warnings)
}

fn collect_ids(records: &[Record]) -> ConvertResult<HashSet<&str>> {
    let mut ids = HashSet::new();
    for record in records {
        if !ids.insert(record.id.as_str()) {
            return Err(ConvertError::DuplicateId {
                id: record.id.clone(),
                kind: record.kind.tag().to_string(),
            });
        }
    }
    Ok(ids)
}

/// Kontrollera DATE-rader direkt under händelsetaggar på nivå 1
fn check_event_dates(record: &Record, warnings: &mut Vec<String>) {
    let mut current_event: Option<&str> = None;

    for line in &record.lines {
        if line.depth <= 1 {
            current_event = if line.depth == 1 && EVENT_TAGS.contains(&line.tag.as_str()) {
                Some(line.tag.as_str())
            } else {
                None
            };
            continue;
        }

        if line.depth == 2 && line.tag == "DATE" {
            if let (Some(event), Some(value)) = (current_event, &line.value) {
                if !GedcomDate::parse(value).is_interpretable() {
                    warnings.push(format!(
                        "Otolkbart datum \"{}\" under {} för {}",
                        value, event, record.id
                    ));
                }
            }
        }
    }
}
