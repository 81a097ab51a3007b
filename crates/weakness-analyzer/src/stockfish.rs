//! Stockfish engine wrapper using UCI protocol (async I/O)

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use tracing::debug;

use crate::error::AnalyzerError;

/// Result of a single position evaluation
#[derive(Debug, Clone, Copy)]
pub struct EvalResult {
    /// Centipawn score (from engine's perspective, i.e., side to move)
    pub cp: Option<i32>,
    /// Mate in N moves (positive = side to move wins)
    pub mate: Option<i32>,
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(path: &str) -> Result<Self, AnalyzerError> {
        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| AnalyzerError::Engine(format!("Failed to spawn Stockfish: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| AnalyzerError::Engine("Stockfish stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| AnalyzerError::Engine("Stockfish stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
        };

        // Initialize UCI
        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        // Configure for analysis
        engine.send("setoption name Threads value 1").await?;
        engine.send("setoption name Hash value 256").await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), AnalyzerError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| AnalyzerError::Engine(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AnalyzerError::Engine(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), AnalyzerError> {
        let mut line = String::new();
        loop {
            line.clear();
            self.stdout
                .read_line(&mut line)
                .await
                .map_err(|e| AnalyzerError::Engine(format!("Failed to read from Stockfish: {e}")))?;
            let trimmed = line.trim();
            debug!(line = trimmed, "SF >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Evaluate a position. The returned score is relative to the side
    /// to move in the given FEN.
    pub async fn evaluate(&mut self, fen: &str, nodes: u32) -> Result<EvalResult, AnalyzerError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go nodes {nodes}")).await?;

        let mut result = EvalResult {
            cp: None,
            mate: None,
        };

        let mut line = String::new();
        loop {
            line.clear();
            self.stdout
                .read_line(&mut line)
                .await
                .map_err(|e| AnalyzerError::Engine(format!("Failed to read from Stockfish: {e}")))?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") {
                if let Some(score) = parse_info_score(trimmed) {
                    result = score;
                }
            } else if trimmed.starts_with("bestmove") {
                break;
            }
        }

        Ok(result)
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Parse the score out of a UCI info line. Terminal positions produce
/// `info depth 0 score mate 0` with no pv, so the parse must not
/// require one.
fn parse_info_score(line: &str) -> Option<EvalResult> {
    if let Some(mate) = parse_mate(line) {
        return Some(EvalResult {
            cp: None,
            mate: Some(mate),
        });
    }
    if let Some(cp) = parse_cp(line) {
        return Some(EvalResult {
            cp: Some(cp),
            mate: None,
        });
    }
    None
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "cp" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "mate" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}
