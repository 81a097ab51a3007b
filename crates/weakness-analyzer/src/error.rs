//! Analyzer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Strategy generation error: {0}")]
    Generation(String),
}
