//! Gedkonv - Konverterare mellan GEDCOM och CSV för släktforskning
//!
//! Läser GEDCOM 5.5-filer och skriver relationella CSV-vyer (personer,
//! familjer, källor), och omvänt.

pub mod cli;
pub mod gedcom;
pub mod models;
pub mod services;
pub mod utils;

// Re-exports
pub use services::{ConvertOptions, ConvertReport, ConvertService};
pub use utils::{ConvertError, ConvertResult};
