//! Analyzer configuration from environment variables

use std::env;

use crate::error::AnalyzerError;

#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Nodes per position for Stockfish analysis
    pub nodes_per_position: u32,

    /// Half-moves analyzed per game (20 ply = first 10 moves per side)
    pub analysis_ply_cap: usize,

    /// Default maximum games fetched per platform
    pub max_games: usize,

    /// Ollama server base URL
    pub ollama_url: String,

    /// Ollama model used for strategy generation
    pub ollama_model: String,
}

impl AnalyzerConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn load() -> Result<Self, AnalyzerError> {
        let stockfish_path = env::var("STOCKFISH_PATH")
            .unwrap_or_else(|_| "/usr/local/bin/stockfish".to_string());

        let nodes_per_position = env::var("NODES_PER_POSITION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100_000);

        let analysis_ply_cap = env::var("ANALYSIS_PLY_CAP")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        let max_games = env::var("MAX_GAMES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let ollama_url =
            env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());

        let ollama_model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| "gemma2:2b".to_string());

        if analysis_ply_cap == 0 {
            return Err(AnalyzerError::Config("ANALYSIS_PLY_CAP must be positive"));
        }

        Ok(Self {
            stockfish_path,
            nodes_per_position,
            analysis_ply_cap,
            max_games,
            ollama_url,
            ollama_model,
        })
    }
}
