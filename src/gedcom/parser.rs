//! GEDCOM-parser för GEDCOM 5.5-filer

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use super::line::Line;
use super::record::{Record, RecordKind};
use crate::utils::error::{ConvertError, ConvertResult};

/// GEDCOM-parser
pub struct GedcomParser;

/// Resultat av GEDCOM-parsning: posterna grupperade per typ samt metadata
/// från HEAD-blocket
#[derive(Debug, Clone, Default)]
pub struct GedcomDocument {
    /// Alla individposter
    pub individuals: Vec<Record>,
    /// Alla familjeposter
    pub families: Vec<Record>,
    /// Alla källposter
    pub sources: Vec<Record>,
    /// Källprogram från HEAD (SOUR)
    pub source: Option<String>,
    /// Teckenuppsättning från HEAD (CHAR)
    pub charset: Option<String>,
}

impl GedcomDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hitta individ med ID
    pub fn find_individual(&self, id: &str) -> Option<&Record> {
        self.individuals.iter().find(|r| r.id == id)
    }

    /// Hitta familj med ID
    pub fn find_family(&self, id: &str) -> Option<&Record> {
        self.families.iter().find(|r| r.id == id)
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl GedcomParser {
    /// Parsa en GEDCOM-fil
    pub fn parse_file(path: &Path, no_cont_conc: bool) -> ConvertResult<GedcomDocument> {
        let file = File::open(path)?;
        Self::parse_reader(BufReader::new(file), no_cont_conc)
    }

    /// Parsa GEDCOM från en sträng
    pub fn parse_string(content: &str, no_cont_conc: bool) -> ConvertResult<GedcomDocument> {
        Self::parse_reader(BufReader::new(content.as_bytes()), no_cont_conc)
    }

    fn parse_reader<R: BufRead>(reader: R, no_cont_conc: bool) -> ConvertResult<GedcomDocument> {
        // Läs in alla icke-tomma rader med radnummer. Inledande blanksteg och
        // BOM tolereras; avslutande blanksteg bevaras eftersom de kan bära
        // data i CONC-fortsättningar.
        let mut raw: Vec<(usize, String)> = Vec::new();
        for (i, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line = line.trim_start_matches('\u{feff}').trim_start();
            if line.trim_end().is_empty() {
                continue;
            }
            raw.push((i + 1, line.to_string()));
        }

        let mut doc = GedcomDocument::new();

        let mut i = 0;
        while i < raw.len() {
            let (line_no, header) = &raw[i];
            if !is_level_zero(header) {
                // Data före första nivå 0-raden är inte giltig GEDCOM
                return Err(ConvertError::InvalidLine {
                    line_no: *line_no,
                    content: header.clone(),
                });
            }

            let mut j = i + 1;
            while j < raw.len() && !is_level_zero(&raw[j].1) {
                j += 1;
            }

            Self::handle_block(&mut doc, &raw[i..j], no_cont_conc)?;
            i = j;
        }

        Ok(doc)
    }

    fn handle_block(
        doc: &mut GedcomDocument,
        block: &[(usize, String)],
        no_cont_conc: bool,
    ) -> ConvertResult<()> {
        let (_, header) = &block[0];

        if let Some((id, kind)) = Record::parse_header(header) {
            let mut body = Vec::with_capacity(block.len() - 1);
            for (line_no, raw_line) in &block[1..] {
                let line = Line::parse(raw_line).ok_or_else(|| ConvertError::InvalidLine {
                    line_no: *line_no,
                    content: raw_line.clone(),
                })?;
                body.push(line);
            }

            let record = Record::new(id, kind, body, no_cont_conc);
            match kind {
                RecordKind::Individual => doc.individuals.push(record),
                RecordKind::Family => doc.families.push(record),
                RecordKind::Source => doc.sources.push(record),
            }
        } else if header.trim_end() == "0 HEAD" {
            Self::parse_head(doc, &block[1..]);
        } else {
            debug!("Hoppar över nivå 0-block: {}", header);
        }

        Ok(())
    }

    /// Plocka ut SOUR och CHAR från HEAD-blocket. Övriga huvudrader är
    /// ointressanta och blocket behöver inte vara strikt välformat.
    fn parse_head(doc: &mut GedcomDocument, body: &[(usize, String)]) {
        for (_, raw_line) in body {
            if let Some(line) = Line::parse(raw_line) {
                if line.depth != 1 {
                    continue;
                }
                match line.tag.as_str() {
                    "SOUR" => doc.source = line.value,
                    "CHAR" => doc.charset = line.value,
                    _ => {}
                }
            }
        }
    }
}

fn is_level_zero(s: &str) -> bool {
    s == "0" || s.starts_with("0 ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_gedcom() {
        let gedcom = r#"0 HEAD
1 SOUR Test
1 CHAR UTF-8
0 @I1@ INDI
1 NAME Johan /Andersson/
1 SEX M
1 BIRT
2 DATE 23 MAY 1850
2 PLAC Stockholm
1 FAMS @F1@
0 @I2@ INDI
1 NAME Anna /Svensson/
1 SEX F
1 FAMS @F1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 MARR
2 DATE 1875
0 TRLR"#;

        let doc = GedcomParser::parse_string(gedcom, false).unwrap();

        assert_eq!(doc.individual_count(), 2);
        assert_eq!(doc.family_count(), 1);
        assert_eq!(doc.source_count(), 0);
        assert_eq!(doc.source, Some("Test".to_string()));
        assert_eq!(doc.charset, Some("UTF-8".to_string()));

        let johan = doc.find_individual("@I1@").unwrap();
        assert_eq!(johan.kind, RecordKind::Individual);
        let rendered: Vec<String> = johan.lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "1 NAME Johan /Andersson/",
                "1 SEX M",
                "1 BIRT",
                "2 DATE 23 MAY 1850",
                "2 PLAC Stockholm",
                "1 FAMS @F1@",
            ]
        );

        let fam = doc.find_family("@F1@").unwrap();
        assert_eq!(fam.lines[0].to_string(), "1 HUSB @I1@");
    }

    #[test]
    fn test_parse_skips_unknown_blocks() {
        let gedcom = r#"0 HEAD
1 SOUR Test
0 @SUB1@ SUBM
1 NAME Inskickare
0 @I1@ INDI
1 NAME Erik /Johansson/
0 @N1@ NOTE
1 CONC en anteckning
0 TRLR"#;

        let doc = GedcomParser::parse_string(gedcom, false).unwrap();
        assert_eq!(doc.individual_count(), 1);
        assert_eq!(doc.family_count(), 0);
    }

    #[test]
    fn test_parse_collapses_continuations() {
        let gedcom = r#"0 @I1@ INDI
1 NOTE Första delen
2 CONT andra delen
2 CONC  och tredje
0 TRLR"#;

        let doc = GedcomParser::parse_string(gedcom, false).unwrap();
        let indi = doc.find_individual("@I1@").unwrap();
        assert_eq!(
            indi.lines[0].value,
            Some("Första delen<<CONT>>andra delen och tredje".to_string())
        );
    }

    #[test]
    fn test_parse_no_cont_conc() {
        let gedcom = r#"0 @I1@ INDI
1 NOTE Första delen
2 CONT andra delen
0 TRLR"#;

        let doc = GedcomParser::parse_string(gedcom, true).unwrap();
        let indi = doc.find_individual("@I1@").unwrap();
        assert_eq!(
            indi.lines[0].value,
            Some("Första delen<<MISSING DATA>>".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_line_reports_line_number() {
        let gedcom = "0 @I1@ INDI\n1 NAME Johan\nskräprad utan nivå\n0 TRLR";

        let err = GedcomParser::parse_string(gedcom, false).unwrap_err();
        match err {
            ConvertError::InvalidLine { line_no, content } => {
                assert_eq!(line_no, 3);
                assert_eq!(content, "skräprad utan nivå");
            }
            other => panic!("fel feltyp: {:?}", other),
        }
    }

    #[test]
    fn test_parse_tolerates_bom_and_blank_lines() {
        let gedcom = "\u{feff}0 HEAD\n\n0 @I1@ INDI\n1 SEX M\n\n0 TRLR\n";

        let doc = GedcomParser::parse_string(gedcom, false).unwrap();
        assert_eq!(doc.individual_count(), 1);
    }

    #[test]
    fn test_parse_interleaved_records() {
        // Posttyperna behöver inte ligga i sammanhängande avsnitt
        let gedcom = r#"0 @I1@ INDI
1 SEX M
0 @F1@ FAM
1 HUSB @I1@
0 @I2@ INDI
1 SEX F
0 @S1@ SOUR
1 TITL Kyrkbok
0 TRLR"#;

        let doc = GedcomParser::parse_string(gedcom, false).unwrap();
        assert_eq!(doc.individual_count(), 2);
        assert_eq!(doc.family_count(), 1);
        assert_eq!(doc.source_count(), 1);
        assert_eq!(
            doc.individuals.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["@I1@", "@I2@"]
        );
    }
}
