use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfQaError {
    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("invalid setting {key}: '{value}'")]
    InvalidSetting { key: String, value: String },
}
