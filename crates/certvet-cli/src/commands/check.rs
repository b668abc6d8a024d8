use std::path::Path;

use certvet_csr::CertificateSigningRequest;
use certvet_inspect::{MemoryClient, Registry, Verdict};
use colored::Colorize;
use tracing::info;

use crate::{
    error::{CliError, CliResult},
    settings::Settings,
};

/// Run the configured pipeline against the request stored in `file`
pub fn handle(settings: &Settings, file: &str) -> CliResult<Verdict> {
    if !Path::new(file).exists() {
        return Err(CliError::FileNotFound(file.to_string()));
    }

    let csr = CertificateSigningRequest::load(file)?;
    let pipeline = Registry::with_builtins().pipeline(&settings.inspectors)?;
    info!(csr = csr.name(), inspectors = ?pipeline.names(), "checking certificate request");

    let client = MemoryClient::new();
    client.insert(csr.clone())?;
    let verdict = pipeline.inspect(&client, &csr)?;

    match &verdict {
        Verdict::Pass => println!("{} {}", "APPROVE".green().bold(), csr.name()),
        Verdict::Reject(reason) => {
            println!("{} {}: {}", "DENY".red().bold(), csr.name(), reason)
        }
    }

    Ok(verdict)
}
