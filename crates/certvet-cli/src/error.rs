use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSR error: {0}")]
    Csr(#[from] certvet_csr::CsrError),

    #[error("Inspection error: {0}")]
    Inspect(#[from] certvet_inspect::InspectError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type CliResult<T> = Result<T, CliError>;
