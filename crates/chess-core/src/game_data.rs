use serde::{Deserialize, Serialize};

/// Which side the target player occupied in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::White => "white",
            PlayerColor::Black => "black",
        }
    }
}

/// Game outcome from the target player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerResult {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub date: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub opening: Option<String>,
    pub link: Option<String>,
}

/// A parsed game straight out of a PGN, before any player-specific
/// classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub metadata: GameMetadata,
    pub moves: Vec<String>, // SAN notation
    pub pgn: String,
}

/// One game resolved into the target player's frame of reference.
/// Constructed once by `classify::classify_game`, immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub target_color: PlayerColor,
    pub result: String,
    pub player_result: PlayerResult,
    pub eco: String,
    pub opening_name: String,
    pub moves: Vec<String>,
}
