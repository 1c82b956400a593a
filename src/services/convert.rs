//! Konverteringstjänsten: GEDCOM → CSV och CSV → GEDCOM

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::gedcom::{GedcomDocument, GedcomParser, GedcomWriter, Record, RecordKind};
use crate::models::Table;
use crate::services::consistency;

/// Inställningar för en konverteringskörning
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// GEDCOM-filen som läses (GED2CSV) eller genereras (CSV2GED)
    pub gedcom_file: PathBuf,
    /// Person-CSV-filen
    pub person_file: PathBuf,
    /// Familje-CSV-filen
    pub family_file: PathBuf,
    /// Käll-CSV-filen; utan den hanteras inga SOUR-poster
    pub source_file: Option<PathBuf>,
    /// Ersätt CONT/CONC-data med platshållare i stället för att fälla ihop
    pub no_cont_conc: bool,
    /// Sätt ' före DATE-värden i CSV-utdata
    pub force_string_dates: bool,
}

/// Resultat av en konvertering
#[derive(Debug, Clone, Default)]
pub struct ConvertReport {
    /// Antal konverterade individposter
    pub individuals: usize,
    /// Antal konverterade familjeposter
    pub families: usize,
    /// Antal konverterade källposter
    pub sources: usize,
    /// Varningar från konsistenskontrollerna
    pub warnings: Vec<String>,
}

impl ConvertReport {
    /// Sammanfattning av körningen
    pub fn summary(&self) -> String {
        format!(
            "{} personer, {} familjer, {} källor konverterade{}",
            self.individuals,
            self.families,
            self.sources,
            if self.warnings.is_empty() {
                String::new()
            } else {
                format!(" ({} varningar)", self.warnings.len())
            }
        )
    }
}

/// Konverteringstjänst
pub struct ConvertService {
    options: ConvertOptions,
}

impl ConvertService {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Konvertera en GEDCOM-fil till CSV-tabeller
    pub fn ged_to_csv(&self) -> Result<ConvertReport> {
        let opts = &self.options;

        let doc = GedcomParser::parse_file(&opts.gedcom_file, opts.no_cont_conc)
            .with_context(|| format!("Kunde inte parsa GEDCOM-filen {}", opts.gedcom_file.display()))?;

        if let Some(source) = &doc.source {
            debug!("Källprogram enligt HEAD: {}", source);
        }
        if let Some(charset) = &doc.charset {
            debug!("Teckenuppsättning enligt HEAD: {}", charset);
        }

        let warnings = consistency::verify(&doc)?;
        for warning in &warnings {
            warn!("{}", warning);
        }

        let persons = Table::from_records(&doc.individuals, opts.force_string_dates);
        Self::write_table(&persons, &opts.person_file, "personfilen")?;

        let families = Table::from_records(&doc.families, opts.force_string_dates);
        Self::write_table(&families, &opts.family_file, "familjefilen")?;

        let sources = match &opts.source_file {
            Some(path) => {
                let table = Table::from_records(&doc.sources, opts.force_string_dates);
                Self::write_table(&table, path, "källfilen")?;
                table.row_count()
            }
            None => {
                if !doc.sources.is_empty() {
                    debug!(
                        "{} källposter utelämnas (ingen källfil angiven)",
                        doc.sources.len()
                    );
                }
                0
            }
        };

        Ok(ConvertReport {
            individuals: persons.row_count(),
            families: families.row_count(),
            sources,
            warnings,
        })
    }

    /// Konvertera CSV-tabeller tillbaka till en GEDCOM-fil
    pub fn csv_to_ged(&self) -> Result<ConvertReport> {
        let opts = &self.options;

        let mut doc = GedcomDocument::new();
        doc.individuals = Self::read_records(&opts.person_file, RecordKind::Individual)?;
        doc.families = Self::read_records(&opts.family_file, RecordKind::Family)?;
        if let Some(path) = &opts.source_file {
            doc.sources = Self::read_records(path, RecordKind::Source)?;
        }

        let warnings = consistency::verify(&doc)?;
        for warning in &warnings {
            warn!("{}", warning);
        }

        let text = GedcomWriter::render_document(&doc);
        fs::write(&opts.gedcom_file, text).with_context(|| {
            format!("Kunde inte skriva GEDCOM-filen {}", opts.gedcom_file.display())
        })?;
        debug!("Skrev GEDCOM till {}", opts.gedcom_file.display());

        Ok(ConvertReport {
            individuals: doc.individual_count(),
            families: doc.family_count(),
            sources: doc.source_count(),
            warnings,
        })
    }

    fn write_table(table: &Table, path: &Path, label: &str) -> Result<()> {
        table
            .write_csv(path)
            .with_context(|| format!("Kunde inte skriva {} {}", label, path.display()))?;
        debug!("Skrev {} rader till {}", table.row_count(), path.display());
        Ok(())
    }

    fn read_records(path: &Path, kind: RecordKind) -> Result<Vec<Record>> {
        let table = Table::read_csv(path)
            .with_context(|| format!("Kunde inte läsa {}", path.display()))?;

        let mut records = Vec::with_capacity(table.row_count());
        for row in 0..table.row_count() {
            let record = Record::from_columns(&table.row_columns(row))
                .with_context(|| format!("Rad {} i {}", row + 2, path.display()))?;
            if record.kind != kind {
                anyhow::bail!(
                    "Rad {} i {}: posttypen {} stämmer inte med förväntad {}",
                    row + 2,
                    path.display(),
                    record.kind.tag(),
                    kind.tag()
                );
            }
            records.push(record);
        }

        Ok(records)
    }
}
