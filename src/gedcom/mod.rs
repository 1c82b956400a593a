//! GEDCOM-hantering: parsning och generering av GEDCOM 5.5-filer

pub mod date;
pub mod line;
pub mod parser;
pub mod record;
pub mod writer;

pub use date::{DateModifier, GedcomDate};
pub use line::{Line, MAX_LINE_LENGTH};
pub use parser::{GedcomDocument, GedcomParser};
pub use record::{Record, RecordKind};
pub use writer::GedcomWriter;
