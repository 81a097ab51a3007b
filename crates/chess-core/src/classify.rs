//! Per-game classification: resolve a parsed game into the target
//! player's frame of reference (color, result, opening name).

use crate::eco;
use crate::game_data::{GameData, GameRecord, PlayerColor, PlayerResult};

/// Classify a parsed game for the given target player.
///
/// Returns None when the username does not match either player name —
/// the game is filtered out, not an error.
///
/// Matching is case-insensitive *substring* containment against the
/// player names, so a username that happens to be a substring of an
/// unrelated name will match. Known limitation, kept for parity with
/// the upstream data pipelines this feeds.
pub fn classify_game(game: &GameData, username: &str) -> Option<GameRecord> {
    if username.is_empty() {
        return None;
    }

    let white_lower = game.metadata.white.to_lowercase();
    let black_lower = game.metadata.black.to_lowercase();
    let target_lower = username.to_lowercase();

    let target_color = if white_lower.contains(&target_lower) {
        PlayerColor::White
    } else if black_lower.contains(&target_lower) {
        PlayerColor::Black
    } else {
        return None;
    };

    let player_result = resolve_result(&game.metadata.result, target_color);

    let eco = game
        .metadata
        .eco
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    let opening_name = eco::opening_name(&eco, game.metadata.opening.as_deref());

    Some(GameRecord {
        white: game.metadata.white.clone(),
        black: game.metadata.black.clone(),
        target_color,
        result: game.metadata.result.clone(),
        player_result,
        eco,
        opening_name,
        moves: game.moves.clone(),
    })
}

/// Translate a raw PGN result string into the target player's frame.
/// Anything other than a decisive result (including "1/2-1/2", "*" or
/// malformed strings) fails safe into a draw.
pub fn resolve_result(result: &str, color: PlayerColor) -> PlayerResult {
    match (color, result) {
        (PlayerColor::White, "1-0") | (PlayerColor::Black, "0-1") => PlayerResult::Win,
        (PlayerColor::White, "0-1") | (PlayerColor::Black, "1-0") => PlayerResult::Loss,
        _ => PlayerResult::Draw,
    }
}
