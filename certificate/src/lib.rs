pub mod code;
pub mod document;
mod error;

pub use error::CertificateError;
