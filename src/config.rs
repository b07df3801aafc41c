use anyhow::{Context, Result};
use serde::Deserialize;

/// Account credentials, read once at startup from a JSON file next to the
/// binary (the same file the vendor scripts use).
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl Credentials {
    pub fn new(file: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read credentials file {file}"))?;
        let credentials: Credentials = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse credentials file {file}"))?;
        Ok(credentials)
    }
}
