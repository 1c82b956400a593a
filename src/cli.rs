//! Kommandoradsgränssnittet

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::services::ConvertOptions;

/// Konverterar GEDCOM-filer till CSV och CSV-filer till GEDCOM
#[derive(Parser, Debug)]
#[command(name = "gedkonv", version)]
pub struct Cli {
    /// Konverteringsriktning
    #[arg(short = 'd', long = "direction", value_enum)]
    pub direction: Direction,

    /// Sökväg till GEDCOM-filen som läses eller genereras
    #[arg(short = 'g', long = "gedcom", value_name = "FIL")]
    pub gedcom_file: PathBuf,

    /// Sökväg till person-CSV-filen som skrivs eller läses
    #[arg(short = 'p', long = "person-file", value_name = "FIL")]
    pub person_file: PathBuf,

    /// Sökväg till familje-CSV-filen som skrivs eller läses
    #[arg(short = 'f', long = "family-file", value_name = "FIL")]
    pub family_file: PathBuf,

    /// Sökväg till käll-CSV-filen; utelämnas den hanteras inga SOUR-poster
    #[arg(short = 's', long = "source-file", value_name = "FIL")]
    pub source_file: Option<PathBuf>,

    /// Utförlig loggning
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Fäll inte ihop CONT/CONC-rader; skriv <<MISSING DATA>> i stället
    #[arg(long = "no-cont-conc")]
    pub no_cont_conc: bool,

    /// Sätt ' före DATE-värden så att kalkylprogram läser dem som text
    #[arg(long = "force-string-dates")]
    pub force_string_dates: bool,
}

/// Konverteringsriktning
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// GEDCOM till CSV
    #[value(name = "GED2CSV")]
    Ged2Csv,
    /// CSV till GEDCOM
    #[value(name = "CSV2GED")]
    Csv2Ged,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ged2Csv => "GED2CSV",
            Direction::Csv2Ged => "CSV2GED",
        }
    }
}

impl Cli {
    /// Kontrollera sökvägar och flaggor mot riktningen. Filer som ska läsas
    /// måste finnas, och filer som ska skrivas får inte finnas eftersom
    /// verktyget aldrig skriver över en befintlig fil. Alla fel samlas och
    /// rapporteras på en gång.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.direction {
            Direction::Ged2Csv => {
                if !self.gedcom_file.exists() {
                    errors.push(format!(
                        "Ogiltig GEDCOM-fil: {} finns inte",
                        self.gedcom_file.display()
                    ));
                }
                for (path, label) in [
                    (Some(&self.person_file), "personfil"),
                    (Some(&self.family_file), "familjefil"),
                    (self.source_file.as_ref(), "källfil"),
                ] {
                    if let Some(path) = path {
                        if path.exists() {
                            errors.push(format!(
                                "Ogiltig {}: {} finns redan! Skriver inte över en befintlig fil",
                                label,
                                path.display()
                            ));
                        }
                    }
                }
            }
            Direction::Csv2Ged => {
                for (path, label) in [
                    (Some(&self.person_file), "personfil"),
                    (Some(&self.family_file), "familjefil"),
                    (self.source_file.as_ref(), "källfil"),
                ] {
                    if let Some(path) = path {
                        if !path.exists() {
                            errors.push(format!(
                                "Ogiltig {}: {} finns inte",
                                label,
                                path.display()
                            ));
                        }
                    }
                }
                if self.gedcom_file.exists() {
                    errors.push(format!(
                        "Ogiltig GEDCOM-fil: {} finns redan! Skriver inte över en befintlig fil",
                        self.gedcom_file.display()
                    ));
                }
                if self.no_cont_conc {
                    errors.push(
                        "Flaggan --no-cont-conc kan inte användas med riktningen CSV2GED"
                            .to_string(),
                    );
                }
                if self.force_string_dates {
                    errors.push(
                        "Flaggan --force-string-dates kan inte användas med riktningen CSV2GED"
                            .to_string(),
                    );
                }
            }
        }

        errors
    }

    /// Inställningar för konverteringstjänsten
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            gedcom_file: self.gedcom_file.clone(),
            person_file: self.person_file.clone(),
            family_file: self.family_file.clone(),
            source_file: self.source_file.clone(),
            no_cont_conc: self.no_cont_conc,
            force_string_dates: self.force_string_dates,
        }
    }
}
