use thiserror::Error;

/// Message used when Telegram rejects a request without a usable description.
pub const UNKNOWN_ERROR: &str = "Unknown error. Check debug log for more information.";

/// Failures that abort an invocation and are reported back to Zabbix.
///
/// The `Display` text is what ends up inside `Sending failed: {..}.`, so the
/// wording of each variant is part of the contract with the alert pipeline.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("Incorrect value is given for parameter \"Token\": parameter is missing")]
    MissingToken,

    #[error("Cannot parse parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// Parameters or settings could not be read at all.
    #[error("{0:#}")]
    Input(anyhow::Error),

    #[error("Invalid proxy '{proxy}': {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Telegram answered with a string `description`.
    #[error("{0}")]
    Api(String),

    #[error("{}", UNKNOWN_ERROR)]
    Unknown,
}

impl SendError {
    /// Line handed back to the alert pipeline on failure.
    pub fn report(&self) -> String {
        format!("Sending failed: {}.", self)
    }
}
