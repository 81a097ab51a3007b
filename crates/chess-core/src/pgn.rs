//! PGN parsing utilities — lightweight regex-based parser.

use regex::Regex;

use crate::game_data::{GameData, GameMetadata};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a single PGN string into a GameData struct.
/// Returns None for PGNs with no moves or a non-standard starting position.
pub fn parse_pgn(pgn: &str) -> Option<GameData> {
    // Extract headers
    let header_re = Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).ok()?;

    let mut white = "Unknown".to_string();
    let mut black = "Unknown".to_string();
    let mut result = "*".to_string();
    let mut date = None;
    let mut time_control = None;
    let mut eco = None;
    let mut opening = None;
    let mut link = None;
    let mut setup = None;
    let mut fen = None;

    for cap in header_re.captures_iter(pgn) {
        let key = &cap[1];
        let value = cap[2].to_string();
        match key {
            "White" => white = value,
            "Black" => black = value,
            "Result" => result = value,
            "Date" => date = Some(value),
            "TimeControl" => time_control = Some(value),
            "ECO" => eco = Some(value),
            "Opening" => opening = Some(value),
            "Link" | "Site" => link = Some(value),
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    // Filter non-standard positions
    if setup.as_deref() == Some("1") {
        if let Some(ref f) = fen {
            if f != STANDARD_START_FEN {
                return None;
            }
        }
    }

    let metadata = GameMetadata {
        white,
        black,
        result,
        date,
        time_control,
        eco,
        opening,
        link,
    };

    // Extract SAN moves
    let moves = extract_moves(pgn);

    if moves.is_empty() {
        return None;
    }

    Some(GameData {
        metadata,
        moves,
        pgn: pgn.to_string(),
    })
}

/// Split a multi-game PGN dump into individual games and parse each.
/// Games that fail to parse are skipped.
pub fn parse_pgn_collection(text: &str) -> Vec<GameData> {
    split_games(text)
        .iter()
        .filter_map(|g| parse_pgn(g))
        .collect()
}

/// Split a PGN dump on game boundaries (a header block following a movetext
/// section starts a new game).
fn split_games(text: &str) -> Vec<String> {
    let mut games = Vec::new();
    let mut current = String::new();
    let mut in_movetext = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            if in_movetext {
                if !current.trim().is_empty() {
                    games.push(current.clone());
                }
                current.clear();
                in_movetext = false;
            }
        } else if !trimmed.is_empty() {
            in_movetext = true;
        }
        current.push_str(line);
        current.push('\n');
    }

    if !current.trim().is_empty() {
        games.push(current);
    }

    games
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Vec<String> {
    // Remove headers
    let header_re = Regex::new(r"\[[^\]]*\]").unwrap();
    let no_headers = header_re.replace_all(pgn, "");

    // Remove comments
    let comment_re = Regex::new(r"\{[^}]*\}").unwrap();
    let no_comments = comment_re.replace_all(&no_headers, "");

    // Remove variations
    let variation_re = Regex::new(r"\([^)]*\)").unwrap();
    let no_variations = variation_re.replace_all(&no_comments, "");

    // Extract moves
    let move_re =
        Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O").unwrap();

    move_re
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}
