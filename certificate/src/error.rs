use thiserror::Error;

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("participant and event identifiers must be non-nil")]
    InvalidIdentifier,
    #[error("check-in code encoding failed: {0}")]
    Encoding(String),
    #[error("certificate rendering failed: {0}")]
    Rendering(String),
}
