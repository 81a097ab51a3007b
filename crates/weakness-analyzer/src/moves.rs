//! Move-quality analysis over whole games.
//!
//! Replays each game with shakmaty, feeds positions to Stockfish and
//! classifies the target player's moves by centipawn loss. When the
//! engine cannot be spawned the whole stage swaps to a heuristic that
//! derives error counts from game length and result — same output
//! shape, no engine scores involved.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shakmaty::{fen::Fen, san::San, Chess, EnPassantMode, Position};
use tracing::{info, warn};

use chess_core::game_data::{GameRecord, PlayerColor, PlayerResult};

use crate::analysis::{
    centipawn_loss, classify_loss, eval_to_cp, to_white_cp, MoveCounts, MoveEvaluation,
};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::stockfish::StockfishEngine;

const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Mock average used by the heuristic path (no engine scores to average).
const HEURISTIC_AVG_CP_LOSS: f64 = 25.0;

/// Heuristic cutoffs: a loss under 30 plies suggests a tactical
/// collapse, under 50 a serious mistake.
const HEURISTIC_BLUNDER_PLIES: usize = 30;
const HEURISTIC_MISTAKE_PLIES: usize = 50;

/// Classified moves and aggregates for a single game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMoveReport {
    pub target_color: PlayerColor,
    pub moves: Vec<MoveEvaluation>,
    pub avg_centipawn_loss: f64,
    pub counts: MoveCounts,
}

/// Error counts for one opening across all analyzed games.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OpeningErrors {
    pub games: u32,
    pub blunders: u32,
    pub mistakes: u32,
    pub inaccuracies: u32,
}

/// Aggregate move-quality output for a whole game set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TacticalStats {
    pub games_analyzed: u32,
    pub counts: MoveCounts,
    pub avg_centipawn_loss: f64,
    pub per_opening: HashMap<String, OpeningErrors>,
}

impl TacticalStats {
    fn absorb(&mut self, eco: &str, report: &GameMoveReport) {
        self.games_analyzed += 1;
        self.counts.merge(&report.counts);

        let entry = self.per_opening.entry(eco.to_string()).or_default();
        entry.games += 1;
        entry.blunders += report.counts.blunders;
        entry.mistakes += report.counts.mistakes;
        entry.inaccuracies += report.counts.inaccuracies;
    }
}

/// Move-quality strategy, selected once at startup. Engine when
/// Stockfish spawns, heuristic otherwise.
pub enum MoveAnalyzer {
    Engine(StockfishEngine),
    Heuristic,
}

impl MoveAnalyzer {
    /// Availability check: try to spawn the engine, fall back to the
    /// heuristic strategy if that fails.
    pub async fn select(config: &AnalyzerConfig) -> Self {
        match StockfishEngine::new(&config.stockfish_path).await {
            Ok(engine) => {
                info!(path = %config.stockfish_path, "Stockfish engine ready");
                MoveAnalyzer::Engine(engine)
            }
            Err(e) => {
                warn!(error = %e, "Stockfish unavailable, using heuristic move analysis");
                MoveAnalyzer::Heuristic
            }
        }
    }

    pub fn is_engine(&self) -> bool {
        matches!(self, MoveAnalyzer::Engine(_))
    }

    /// Analyze every game in the set. Per-game failures degrade to a
    /// smaller result rather than aborting the run.
    pub async fn analyze_games(
        &mut self,
        records: &[GameRecord],
        config: &AnalyzerConfig,
    ) -> TacticalStats {
        let mut stats = TacticalStats::default();
        let mut total_avg_loss = 0.0;

        for rec in records {
            let report = match self {
                MoveAnalyzer::Engine(engine) => {
                    match analyze_game_moves(engine, rec, config.analysis_ply_cap, config.nodes_per_position)
                        .await
                    {
                        Ok(report) => report,
                        Err(e) => {
                            warn!(eco = %rec.eco, error = %e, "Engine analysis failed for game, skipping");
                            continue;
                        }
                    }
                }
                MoveAnalyzer::Heuristic => heuristic_game_report(rec),
            };

            total_avg_loss += report.avg_centipawn_loss;
            stats.absorb(&rec.eco, &report);
        }

        if stats.games_analyzed > 0 {
            stats.avg_centipawn_loss = total_avg_loss / stats.games_analyzed as f64;
        }

        stats
    }

    pub async fn shutdown(self) {
        if let MoveAnalyzer::Engine(mut engine) = self {
            engine.quit().await;
        }
    }
}

/// Engine-backed per-game analysis, capped at `ply_cap` half-moves.
/// Opponent plies only drive board state forward and supply the next
/// "before" score.
async fn analyze_game_moves(
    engine: &mut StockfishEngine,
    rec: &GameRecord,
    ply_cap: usize,
    nodes: u32,
) -> Result<GameMoveReport, AnalyzerError> {
    let start = engine.evaluate(STARTING_FEN, nodes).await?;
    // White to move in the initial position, so the relative score is
    // already White-perspective.
    let mut prev_white = to_white_cp(eval_to_cp(start), true);

    let mut evaluations = Vec::new();
    let mut counts = MoveCounts::default();
    let mut total_loss = 0i64;
    let mut target_moves = 0u32;

    for (i, fen) in build_fen_sequence(&rec.moves, ply_cap).iter().enumerate() {
        let ply = i + 1;
        let white_moved = i % 2 == 0;

        let result = engine.evaluate(fen, nodes).await?;
        // After the move the opponent is to move; normalize per ply.
        let after_white = to_white_cp(eval_to_cp(result), !white_moved);

        let mover_is_target = match rec.target_color {
            PlayerColor::White => white_moved,
            PlayerColor::Black => !white_moved,
        };

        if mover_is_target {
            let loss = centipawn_loss(prev_white, after_white, white_moved);
            let category = classify_loss(loss);
            counts.record(category);
            total_loss += loss as i64;
            target_moves += 1;
            evaluations.push(MoveEvaluation {
                ply,
                score_before: prev_white,
                score_after: after_white,
                centipawn_loss: loss,
                category,
            });
        }

        prev_white = after_white;
    }

    let avg_centipawn_loss = if target_moves > 0 {
        total_loss as f64 / target_moves as f64
    } else {
        0.0
    };

    Ok(GameMoveReport {
        target_color: rec.target_color,
        moves: evaluations,
        avg_centipawn_loss,
        counts,
    })
}

/// Heuristic per-game analysis: no engine scores, counts derived from
/// game length and result only. Produces the same report shape with an
/// empty move list.
pub fn heuristic_game_report(rec: &GameRecord) -> GameMoveReport {
    let plies = rec.moves.len();
    let mut counts = MoveCounts::default();

    if rec.player_result == PlayerResult::Loss {
        if plies < HEURISTIC_BLUNDER_PLIES {
            counts.blunders += 1;
        } else if plies < HEURISTIC_MISTAKE_PLIES {
            counts.mistakes += 1;
        }
    }

    GameMoveReport {
        target_color: rec.target_color,
        moves: Vec::new(),
        avg_centipawn_loss: HEURISTIC_AVG_CP_LOSS,
        counts,
    }
}

/// Replay SAN moves from the starting position, returning the FEN after
/// each ply. Stops at the first unparseable or illegal move.
pub fn build_fen_sequence(moves: &[String], ply_cap: usize) -> Vec<String> {
    let mut pos = Chess::default();
    let mut fens = Vec::new();

    for san_str in moves.iter().take(ply_cap) {
        let san: San = match san_str.parse() {
            Ok(s) => s,
            Err(_) => break,
        };
        let mv = match san.to_move(&pos) {
            Ok(m) => m,
            Err(_) => break,
        };
        pos.play_unchecked(mv);
        fens.push(Fen::from_position(&pos, EnPassantMode::Legal).to_string());
    }

    fens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loss_record(eco: &str, plies: usize) -> GameRecord {
        GameRecord {
            white: "opponent".to_string(),
            black: "bob".to_string(),
            target_color: PlayerColor::Black,
            result: "1-0".to_string(),
            player_result: PlayerResult::Loss,
            eco: eco.to_string(),
            opening_name: format!("ECO {eco} unknown"),
            moves: vec!["e4".to_string(); plies],
        }
    }

    #[test]
    fn test_heuristic_quick_loss_is_blunder() {
        let report = heuristic_game_report(&loss_record("C55", 18));
        assert_eq!(report.counts.blunders, 1);
        assert_eq!(report.counts.mistakes, 0);
        assert!(report.moves.is_empty());
    }

    #[test]
    fn test_heuristic_medium_loss_is_mistake() {
        let report = heuristic_game_report(&loss_record("C55", 40));
        assert_eq!(report.counts.blunders, 0);
        assert_eq!(report.counts.mistakes, 1);
    }

    #[test]
    fn test_heuristic_long_loss_and_wins_are_clean() {
        let report = heuristic_game_report(&loss_record("C55", 80));
        assert_eq!(report.counts.blunders, 0);
        assert_eq!(report.counts.mistakes, 0);

        let mut win = loss_record("C55", 18);
        win.player_result = PlayerResult::Win;
        let report = heuristic_game_report(&win);
        assert_eq!(report.counts.blunders, 0);
    }

    #[test]
    fn test_fen_sequence_replay() {
        let moves: Vec<String> = vec!["e4".into(), "e5".into()];
        let fens = build_fen_sequence(&moves, 20);
        assert_eq!(fens.len(), 2);
        assert_eq!(
            fens[0],
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(
            fens[1],
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
        );
    }

    #[test]
    fn test_fen_sequence_stops_at_illegal_move() {
        let moves: Vec<String> = vec!["e4".into(), "e4".into()];
        let fens = build_fen_sequence(&moves, 20);
        assert_eq!(fens.len(), 1);
    }

    #[test]
    fn test_fen_sequence_respects_ply_cap() {
        let moves: Vec<String> = vec!["e4".into(), "e5".into(), "Nf3".into(), "Nc6".into()];
        assert_eq!(build_fen_sequence(&moves, 2).len(), 2);
    }
}
