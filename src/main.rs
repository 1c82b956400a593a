//! Gedkonv - Entry Point
//!
//! Kommandoradsverktyg som konverterar släktdata mellan GEDCOM 5.5 och CSV.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use gedkonv::cli::{Cli, Direction};
use gedkonv::{ConvertError, ConvertService};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initiera logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("Startar gedkonv v{}", env!("CARGO_PKG_VERSION"));
    debug!("Riktning: {}", cli.direction.as_str());
    debug!("GEDCOM-fil: {}", cli.gedcom_file.display());
    debug!("Personfil: {}", cli.person_file.display());
    debug!("Familjefil: {}", cli.family_file.display());
    if let Some(source_file) = &cli.source_file {
        debug!("Källfil: {}", source_file.display());
    }

    // Kontrollera sökvägar och flaggor innan något skrivs
    let errors = cli.validate();
    if !errors.is_empty() {
        return Err(ConvertError::validation(&errors).into());
    }
    debug!("Validering lyckades");

    let service = ConvertService::new(cli.options());
    let report = match cli.direction {
        Direction::Ged2Csv => {
            info!("Konverterar {} till CSV", cli.gedcom_file.display());
            service.ged_to_csv()?
        }
        Direction::Csv2Ged => {
            info!(
                "Konverterar {} och {} till GEDCOM",
                cli.person_file.display(),
                cli.family_file.display()
            );
            service.csv_to_ged()?
        }
    };

    info!("{}", report.summary());
    Ok(())
}
