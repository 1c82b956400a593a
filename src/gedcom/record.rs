//! Poster på nivå 0: INDI, FAM och SOUR

use std::collections::HashSet;

use super::line::{split_at_char_boundary, Line, MAX_LINE_LENGTH};
use crate::utils::error::{ConvertError, ConvertResult};

/// Platshållare i CSV-celler för rader som saknar värde
pub const EMPTY_VALUE_PLACEHOLDER: &str = "<<NONE>>";

/// Platshållare för radbrytningar som fällts ihop från CONT-rader
pub const CONT_PLACEHOLDER: &str = "<<CONT>>";

/// Platshållare som ersätter bortkastade CONT/CONC-data
pub const MISSING_DATA_PLACEHOLDER: &str = "<<MISSING DATA>>";

const ACTIVE_TAG_SEPARATOR: &str = "+";
const SUFFIX_SEPARATOR: char = '~';
const DATE_TAG: &str = "DATE";

/// Typ av post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Individ (INDI)
    Individual,
    /// Familj (FAM)
    Family,
    /// Källa (SOUR)
    Source,
}

impl RecordKind {
    pub fn tag(&self) -> &'static str {
        match self {
            RecordKind::Individual => "INDI",
            RecordKind::Family => "FAM",
            RecordKind::Source => "SOUR",
        }
    }

    pub fn from_tag(s: &str) -> Option<RecordKind> {
        match s {
            "INDI" => Some(RecordKind::Individual),
            "FAM" => Some(RecordKind::Family),
            "SOUR" => Some(RecordKind::Source),
            _ => None,
        }
    }
}

/// En hel post: huvudraden `0 @xref@ KIND` plus underordnade rader.
///
/// CONT/CONC-rader fälls ihop (eller kastas) redan när posten skapas, så
/// `lines` innehåller bara logiska rader.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Xref-ID, t.ex. "@I42@"
    pub id: String,
    pub kind: RecordKind,
    pub lines: Vec<Line>,
}

impl Record {
    /// Skapa en post från huvuddata och kroppsrader. `no_cont_conc` styr om
    /// fortsättningsrader fälls ihop eller ersätts med platshållare.
    pub fn new(id: String, kind: RecordKind, body: Vec<Line>, no_cont_conc: bool) -> Self {
        let lines = if no_cont_conc {
            remove_cont_conc(body)
        } else {
            collapse_cont_conc(body)
        };
        Self { id, kind, lines }
    }

    /// Tolka en huvudrad `0 @xref@ KIND`. Returnerar `None` för alla andra
    /// nivå 0-rader (HEAD, TRLR, SUBM, okända posttyper).
    pub fn parse_header(s: &str) -> Option<(String, RecordKind)> {
        let mut parts = s.splitn(3, ' ');
        if parts.next()? != "0" {
            return None;
        }

        let xref = parts.next()?;
        if xref.len() < 3 || !xref.starts_with('@') || !xref.ends_with('@') {
            return None;
        }

        let kind = RecordKind::from_tag(parts.next()?.trim_end())?;
        Some((xref.to_string(), kind))
    }

    /// Platta ut posten till kolumnnamn/värde-par för en CSV-rad.
    ///
    /// Nästlade taggar sätts ihop med `+` utifrån en stack av aktiva taggar:
    ///
    /// ```text
    /// 0 @I42@ INDI
    /// 1 NAME Leonard Frank /Bartos/
    /// 2 GIVN Leonard Frank
    /// 1 SEX M
    /// ```
    ///
    /// blir kolumnerna `id`, `tag_type`, `NAME`, `NAME+GIVN` och `SEX`.
    /// Upprepade kolumnnamn får suffixet `~N` på sista ledet. Rader utan
    /// värde lagras som `<<NONE>>`.
    pub fn to_columns(&self, force_string_dates: bool) -> Vec<(String, String)> {
        let mut columns: Vec<(String, String)> = vec![
            ("id".to_string(), self.id.clone()),
            ("tag_type".to_string(), self.kind.tag().to_string()),
        ];
        let mut seen: HashSet<String> = HashSet::new();
        let mut active_tags: Vec<String> = Vec::new();

        for line in &self.lines {
            let depth = line.depth as usize;
            if depth <= active_tags.len() + 1 {
                active_tags.truncate(depth.saturating_sub(1));
            }
            active_tags.push(line.tag.clone());

            let value = match &line.value {
                None => EMPTY_VALUE_PLACEHOLDER.to_string(),
                Some(v) if force_string_dates && line.tag == DATE_TAG && !v.starts_with('\'') => {
                    format!("'{}", v)
                }
                Some(v) => v.clone(),
            };

            // Unika kolumnnamn: andra NAME blir NAME~1, dess GIVN NAME~1+GIVN
            let mut suffix = 0;
            while seen.contains(&join_tags(&active_tags)) {
                suffix += 1;
                if let Some(last) = active_tags.last_mut() {
                    *last = format!("{}{}{}", line.tag, SUFFIX_SEPARATOR, suffix);
                }
            }

            let key = join_tags(&active_tags);
            seen.insert(key.clone());
            columns.push((key, value));
        }

        columns
    }

    /// Bygg upp en post ur kolumnnamn/värde-par, inversen till
    /// [`Record::to_columns`]. Delade prefix förenas så att `BIRT+DATE` och
    /// `BIRT+PLAC` hamnar under samma BIRT-rad, och `~N`-suffix skiljer
    /// upprepade syskon åt innan de tas bort ur den utskrivna taggen.
    pub fn from_columns(columns: &[(String, String)]) -> ConvertResult<Record> {
        let mut id: Option<String> = None;
        let mut kind: Option<RecordKind> = None;
        let mut roots: Vec<Node> = Vec::new();

        for (key, value) in columns {
            match key.as_str() {
                "id" => id = Some(value.clone()),
                "tag_type" => {
                    kind = Some(RecordKind::from_tag(value).ok_or_else(|| {
                        ConvertError::other(format!("Okänd posttyp i kolumnen tag_type: {}", value))
                    })?);
                }
                _ => insert_path(&mut roots, key, value),
            }
        }

        let id = id.ok_or_else(|| ConvertError::other("Kolumnen 'id' saknas"))?;
        let kind = kind.ok_or_else(|| ConvertError::other("Kolumnen 'tag_type' saknas"))?;

        let mut lines = Vec::new();
        emit_nodes(&roots, 1, &mut lines);

        Ok(Record { id, kind, lines })
    }
}

/// Nod i det återuppbyggda taggträdet. Nyckeln behåller sitt `~N`-suffix så
/// att upprepade syskon inte förenas av misstag.
struct Node {
    key: String,
    value: Option<String>,
    children: Vec<Node>,
}

fn insert_path(roots: &mut Vec<Node>, key: &str, value: &str) {
    let segments: Vec<&str> = key.split(ACTIVE_TAG_SEPARATOR).collect();
    let mut children = roots;

    for (i, segment) in segments.iter().enumerate() {
        let idx = match children.iter().position(|c| c.key == *segment) {
            Some(idx) => idx,
            None => {
                children.push(Node {
                    key: segment.to_string(),
                    value: None,
                    children: Vec::new(),
                });
                children.len() - 1
            }
        };

        if i + 1 == segments.len() && value != EMPTY_VALUE_PLACEHOLDER {
            children[idx].value = Some(value.to_string());
        }

        children = &mut children[idx].children;
    }
}

fn emit_nodes(nodes: &[Node], depth: u32, lines: &mut Vec<Line>) {
    for node in nodes {
        lines.push(Line::new(depth, strip_suffix(&node.key), node.value.clone()));
        emit_nodes(&node.children, depth + 1, lines);
    }
}

/// Ta bort ett `~N`-suffix ur ett kolumnled: `NAME~1` blir `NAME`
fn strip_suffix(key: &str) -> &str {
    if let Some((base, suffix)) = key.rsplit_once(SUFFIX_SEPARATOR) {
        if !base.is_empty() && !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            return base;
        }
    }
    key
}

/// Fäll ihop CONT/CONC-rader i raden de fortsätter. CONT lägger in
/// platshållaren `<<CONT>>` mellan delarna, CONC sätter ihop dem direkt.
fn collapse_cont_conc(body: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::new();

    for line in body {
        match line.tag.as_str() {
            "CONT" => {
                if let Some(prev) = out.last_mut() {
                    let chunk = line.value.unwrap_or_default();
                    prev.value = Some(match prev.value.take() {
                        Some(v) => format!("{}{}{}", v, CONT_PLACEHOLDER, chunk),
                        None => format!("{}{}", CONT_PLACEHOLDER, chunk),
                    });
                }
            }
            "CONC" => {
                if let Some(prev) = out.last_mut() {
                    let chunk = line.value.unwrap_or_default();
                    prev.value = Some(match prev.value.take() {
                        Some(v) => format!("{}{}", v, chunk),
                        None => chunk,
                    });
                }
            }
            _ => out.push(line),
        }
    }

    out
}

/// Kasta CONT/CONC-data och markera förlusten med `<<MISSING DATA>>` på
/// raden som fortsattes. En svit av fortsättningsrader ger en enda markering.
fn remove_cont_conc(body: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::new();
    let mut in_run = false;

    for line in body {
        if line.tag == "CONT" || line.tag == "CONC" {
            if !in_run {
                in_run = true;
                if let Some(prev) = out.last_mut() {
                    append_missing_data(prev);
                }
            }
        } else {
            in_run = false;
            out.push(line);
        }
    }

    out
}

/// Lägg till platshållaren och korta av värdet så att raden håller sig inom
/// radlängdsbudgeten.
fn append_missing_data(line: &mut Line) {
    match line.value.take() {
        None => line.value = Some(MISSING_DATA_PLACEHOLDER.to_string()),
        Some(v) => {
            let placeholder_len = MISSING_DATA_PLACEHOLDER.chars().count();
            let prefix_len = line.depth.to_string().len() + 1 + line.tag.chars().count() + 1;
            let budget = MAX_LINE_LENGTH
                .saturating_sub(placeholder_len)
                .saturating_sub(prefix_len);

            let kept = if v.chars().count() > budget {
                split_at_char_boundary(&v, budget).0.to_string()
            } else {
                v
            };
            line.value = Some(format!("{}{}", kept, MISSING_DATA_PLACEHOLDER));
        }
    }
}

fn join_tags(tags: &[String]) -> String {
    tags.join(ACTIVE_TAG_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<Line> {
        raw.iter().map(|s| Line::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            Record::parse_header("0 @I1@ INDI"),
            Some(("@I1@".to_string(), RecordKind::Individual))
        );
        assert_eq!(
            Record::parse_header("0 @F1@ FAM"),
            Some(("@F1@".to_string(), RecordKind::Family))
        );
        // Xref-format från verkliga exporter
        assert_eq!(
            Record::parse_header("0 @P33@ INDI"),
            Some(("@P33@".to_string(), RecordKind::Individual))
        );
        assert_eq!(
            Record::parse_header("0 @S-898380968@ SOUR"),
            Some(("@S-898380968@".to_string(), RecordKind::Source))
        );

        assert_eq!(Record::parse_header("0 HEAD"), None);
        assert_eq!(Record::parse_header("0 TRLR"), None);
        assert_eq!(Record::parse_header("0 @SUB1@ SUBM"), None);
        assert_eq!(Record::parse_header("1 @I1@ INDI"), None);
    }

    #[test]
    fn test_to_columns() {
        let record = Record::new(
            "@I42@".to_string(),
            RecordKind::Individual,
            lines(&[
                "1 NAME Leonard Frank /Bartos/",
                "2 GIVN Leonard Frank",
                "2 NSFX RPh",
                "1 SEX M",
                "1 _UID 4EF44217DF0F40419968D80B5CC5FE8491FB",
            ]),
            false,
        );

        let columns = record.to_columns(false);
        assert_eq!(
            columns,
            vec![
                ("id".to_string(), "@I42@".to_string()),
                ("tag_type".to_string(), "INDI".to_string()),
                ("NAME".to_string(), "Leonard Frank /Bartos/".to_string()),
                ("NAME+GIVN".to_string(), "Leonard Frank".to_string()),
                ("NAME+NSFX".to_string(), "RPh".to_string()),
                ("SEX".to_string(), "M".to_string()),
                (
                    "_UID".to_string(),
                    "4EF44217DF0F40419968D80B5CC5FE8491FB".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_to_columns_empty_value_and_suffix() {
        let record = Record::new(
            "@P33@".to_string(),
            RecordKind::Individual,
            lines(&[
                "1 NAME Johan Peter /Carleson/",
                "2 GIVN Johan Peter",
                "1 NAME /Carlsson/",
                "2 GIVN Carl",
                "1 BIRT",
                "2 DATE 15 NOV 1875",
            ]),
            false,
        );

        let columns = record.to_columns(false);
        let keys: Vec<&str> = columns.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "tag_type",
                "NAME",
                "NAME+GIVN",
                "NAME~1",
                "NAME~1+GIVN",
                "BIRT",
                "BIRT+DATE"
            ]
        );

        // BIRT saknar värde
        assert_eq!(columns[6].1, EMPTY_VALUE_PLACEHOLDER);
    }

    #[test]
    fn test_to_columns_force_string_dates() {
        let record = Record::new(
            "@I1@".to_string(),
            RecordKind::Individual,
            lines(&["1 BIRT", "2 DATE 23 MAY 1850"]),
            false,
        );

        let columns = record.to_columns(true);
        let date = columns.iter().find(|(k, _)| k == "BIRT+DATE").unwrap();
        assert_eq!(date.1, "'23 MAY 1850");

        // Redan citerade värden citeras inte en gång till
        let record = Record::new(
            "@I1@".to_string(),
            RecordKind::Individual,
            lines(&["1 BIRT", "2 DATE '1850"]),
            false,
        );
        let columns = record.to_columns(true);
        let date = columns.iter().find(|(k, _)| k == "BIRT+DATE").unwrap();
        assert_eq!(date.1, "'1850");
    }

    #[test]
    fn test_collapse_cont_conc() {
        let record = Record::new(
            "@I1@".to_string(),
            RecordKind::Individual,
            lines(&[
                "1 NOTE This is a long",
                "2 CONT long long long ",
                "2 CONC long long long note",
            ]),
            false,
        );

        assert_eq!(record.lines.len(), 1);
        assert_eq!(
            record.lines[0].value,
            Some("This is a long<<CONT>>long long long long long long note".to_string())
        );
    }

    #[test]
    fn test_collapse_cont_on_empty_line() {
        let record = Record::new(
            "@I1@".to_string(),
            RecordKind::Individual,
            lines(&["1 NOTE", "2 CONT fortsättning"]),
            false,
        );

        assert_eq!(record.lines[0].value, Some("<<CONT>>fortsättning".to_string()));
    }

    #[test]
    fn test_remove_cont_conc() {
        let record = Record::new(
            "@I1@".to_string(),
            RecordKind::Individual,
            lines(&[
                "1 NOTE This is a long",
                "2 CONT long long long ",
                "2 CONC long long long note",
                "1 SEX M",
            ]),
            true,
        );

        assert_eq!(record.lines.len(), 2);
        assert_eq!(
            record.lines[0].value,
            Some("This is a long<<MISSING DATA>>".to_string())
        );
        assert_eq!(record.lines[1].tag, "SEX");
    }

    #[test]
    fn test_remove_cont_conc_truncates_long_line() {
        let long_value = "x".repeat(100);
        let record = Record::new(
            "@I1@".to_string(),
            RecordKind::Individual,
            vec![
                Line::new(1, "NOTE", Some(long_value)),
                Line::new(2, "CONT", Some("mer".to_string())),
            ],
            true,
        );

        let line = &record.lines[0];
        assert!(line.value.as_ref().unwrap().ends_with(MISSING_DATA_PLACEHOLDER));
        assert!(line.rendered_len() <= MAX_LINE_LENGTH);
    }

    #[test]
    fn test_from_columns_round_trip() {
        let record = Record::new(
            "@P33@".to_string(),
            RecordKind::Individual,
            lines(&[
                "1 NAME Johan Peter /Carleson/",
                "2 GIVN Johan Peter",
                "2 SURN Carleson",
                "1 NAME /Carlsson/",
                "2 SURN Carlsson",
                "1 SEX M",
                "1 BIRT",
                "2 DATE 15 NOV 1875",
                "2 PLAC Virestad, Kronobergs län",
            ]),
            false,
        );

        let rebuilt = Record::from_columns(&record.to_columns(false)).unwrap();
        assert_eq!(rebuilt, record);
    }

    #[test]
    fn test_from_columns_merges_shared_prefix() {
        // Kolumnordningen skiljer sig från radordningen, men BIRT+DATE och
        // BIRT+PLAC ska ändå hamna under en och samma BIRT-rad
        let columns = vec![
            ("id".to_string(), "@I1@".to_string()),
            ("tag_type".to_string(), "INDI".to_string()),
            ("BIRT".to_string(), EMPTY_VALUE_PLACEHOLDER.to_string()),
            ("BIRT+DATE".to_string(), "1850".to_string()),
            ("SEX".to_string(), "M".to_string()),
            ("BIRT+PLAC".to_string(), "Stockholm".to_string()),
        ];

        let record = Record::from_columns(&columns).unwrap();
        let rendered: Vec<String> = record.lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "1 BIRT",
                "2 DATE 1850",
                "2 PLAC Stockholm",
                "1 SEX M",
            ]
        );
    }

    #[test]
    fn test_from_columns_missing_id() {
        let columns = vec![("tag_type".to_string(), "INDI".to_string())];
        assert!(Record::from_columns(&columns).is_err());
    }

    #[test]
    fn test_strip_suffix() {
        assert_eq!(strip_suffix("NAME~1"), "NAME");
        assert_eq!(strip_suffix("NAME"), "NAME");
        assert_eq!(strip_suffix("_UID~12"), "_UID");
    }
}
