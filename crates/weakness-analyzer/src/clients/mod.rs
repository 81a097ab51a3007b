//! HTTP clients for the public game archives.

pub mod chess_com;
pub mod lichess;

use tracing::{info, warn};

use chess_core::game_data::GameData;
use chess_core::pgn;

use crate::error::AnalyzerError;

/// Which platform(s) to pull games from. The single selector replaces
/// per-platform pipeline copies; everything downstream is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    ChessCom,
    Lichess,
    Both,
}

impl Platform {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chesscom" | "chess.com" | "chess_com" => Some(Platform::ChessCom),
            "lichess" => Some(Platform::Lichess),
            "both" => Some(Platform::Both),
            _ => None,
        }
    }
}

/// Fetch and parse up to `max_games` games per selected platform.
/// One platform failing degrades to whatever the other returned; an
/// error is only raised when every selected platform failed and no
/// games were fetched at all.
pub async fn fetch_games(
    platform: Platform,
    username: &str,
    max_games: usize,
) -> Result<Vec<GameData>, AnalyzerError> {
    let mut pgns: Vec<String> = Vec::new();
    let mut last_error: Option<String> = None;

    if matches!(platform, Platform::ChessCom | Platform::Both) {
        let client = chess_com::ChessComClient::new();
        match client.fetch_user_games(username, max_games).await {
            Ok(games) => {
                info!(count = games.len(), "Fetched Chess.com games");
                pgns.extend(games);
            }
            Err(e) => {
                warn!(error = %e, "Chess.com fetch failed");
                last_error = Some(e);
            }
        }
    }

    if matches!(platform, Platform::Lichess | Platform::Both) {
        let client = lichess::LichessClient::new();
        match client.fetch_user_games(username, Some(max_games)).await {
            Ok(games) => {
                info!(count = games.len(), "Fetched Lichess games");
                pgns.extend(games);
            }
            Err(e) => {
                warn!(error = %e, "Lichess fetch failed");
                last_error = Some(e);
            }
        }
    }

    if pgns.is_empty() {
        if let Some(e) = last_error {
            return Err(AnalyzerError::Client(e));
        }
    }

    let games: Vec<GameData> = pgns.iter().filter_map(|p| pgn::parse_pgn(p)).collect();
    info!(parsed = games.len(), fetched = pgns.len(), "Parsed games");
    Ok(games)
}
