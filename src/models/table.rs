//! Kolumntabell: den relationella vyn av en postsamling

use std::collections::HashMap;
use std::path::Path;

use crate::gedcom::Record;
use crate::utils::error::ConvertResult;

/// En tabell med rubrikrad och rader. Celler som saknas för en post är
/// tomma strängar; ett tomt cellvärde betyder alltså "kolumnen gäller inte
/// den här posten".
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Bygg en tabell av poster av samma typ. Rubrikraden är unionen av
    /// alla posters kolumner i först-sedd-ordning, med `id` och `tag_type`
    /// alltid först.
    pub fn from_records(records: &[Record], force_string_dates: bool) -> Table {
        let record_columns: Vec<Vec<(String, String)>> = records
            .iter()
            .map(|r| r.to_columns(force_string_dates))
            .collect();

        let mut headers: Vec<String> = vec!["id".to_string(), "tag_type".to_string()];
        let mut index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        for columns in &record_columns {
            for (key, _) in columns {
                if !index.contains_key(key) {
                    index.insert(key.clone(), headers.len());
                    headers.push(key.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(record_columns.len());
        for columns in record_columns {
            let mut row = vec![String::new(); headers.len()];
            for (key, value) in columns {
                if let Some(&i) = index.get(&key) {
                    row[i] = value;
                }
            }
            rows.push(row);
        }

        Table { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Kolumnnamn/värde-par för en rad, utan tomma celler
    pub fn row_columns(&self, row: usize) -> Vec<(String, String)> {
        self.headers
            .iter()
            .zip(&self.rows[row])
            .filter(|(_, value)| !value.is_empty())
            .map(|(header, value)| (header.clone(), value.clone()))
            .collect()
    }

    /// Skriv tabellen som CSV
    pub fn write_csv(&self, path: &Path) -> ConvertResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Läs en tabell från CSV. Rader som är kortare än rubrikraden
    /// accepteras; saknade celler räknas som tomma.
    pub fn read_csv(path: &Path) -> ConvertResult<Table> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table { headers, rows })
    }
}
