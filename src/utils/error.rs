use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO-fel: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV-fel: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ogiltig GEDCOM-rad {line_no}: {content}")]
    InvalidLine { line_no: usize, content: String },

    #[error("Dubblerat post-ID {id} bland {kind}-poster")]
    DuplicateId { id: String, kind: String },

    #[error("Valideringsfel:\n{0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

impl ConvertError {
    pub fn validation(errors: &[String]) -> Self {
        Self::Validation(errors.join("\n"))
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

pub type ConvertResult<T> = Result<T, ConvertError>;
