pub mod analysis;
pub mod clients;
pub mod config;
pub mod error;
pub mod moves;
pub mod ollama;
pub mod report;
pub mod stockfish;
