use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

/// Reader failures collapse into `InputRead`; only the extension check is
/// reported separately.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Could not read input: {0}")]
    InputRead(String),

    #[error("Could not write output: {0}")]
    Write(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::XlsxError> for IoError {
    fn from(e: calamine::XlsxError) -> Self {
        IoError::InputRead(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for IoError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        IoError::Write(e.to_string())
    }
}
