//! Opening weakness aggregation and scoring.
//!
//! Groups classified games into (ECO, color) buckets, scans loss
//! patterns across the whole game set, and ranks buckets by a composite
//! 0–100 weakness score. Pure functions over in-memory lists; every run
//! is a fresh computation and the output is a read-only report.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::game_data::{GameRecord, PlayerColor, PlayerResult};

/// Penalty applied when a bucket has fewer than 3 games.
const INEXPERIENCE_PENALTY_HARD: f64 = 20.0;
/// Penalty applied when a bucket has 3 or 4 games.
const INEXPERIENCE_PENALTY_SOFT: f64 = 10.0;
/// Penalty per game lost quickly in the same opening.
const QUICK_LOSS_PENALTY: f64 = 15.0;
/// One-time penalty for two or more losses in the same opening.
const REPETITIVE_LOSS_PENALTY: f64 = 25.0;
/// Hard cap on the composite score.
const MAX_WEAKNESS_SCORE: f64 = 100.0;

/// A loss in under this many plies counts as a quick loss.
const QUICK_LOSS_PLIES: usize = 25;

/// Simple-filter thresholds (percent).
const SIMPLE_FILTER_MIN_GAMES: usize = 3;
const SIMPLE_FILTER_MAX_WIN_RATE: f64 = 40.0;
const SIMPLE_FILTER_MIN_LOSS_RATE: f64 = 60.0;

/// All games for one (ECO, color) pair. Only constructed when at least
/// one game exists, so the rate computations never divide by zero.
#[derive(Debug, Clone)]
pub struct OpeningBucket {
    pub eco: String,
    pub opening_name: String,
    pub color: PlayerColor,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl OpeningBucket {
    pub fn total_games(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    /// Win rate as a percentage in [0, 100].
    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / self.total_games() as f64 * 100.0
    }

    /// Loss rate as a percentage in [0, 100].
    pub fn loss_rate(&self) -> f64 {
        self.losses as f64 / self.total_games() as f64 * 100.0
    }
}

/// One ranked row of the weakness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessEntry {
    pub eco: String,
    pub opening_name: String,
    pub color: PlayerColor,
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
    pub weakness_score: f64,
}

/// Loss patterns scanned across the whole game set, keyed by ECO code
/// only — shared between the white and black buckets of an opening.
#[derive(Debug, Default)]
pub struct LossPatterns {
    /// Games lost in under QUICK_LOSS_PLIES plies, per ECO.
    quick_losses: HashMap<String, usize>,
    /// Total losses per ECO.
    losses: HashMap<String, usize>,
}

impl LossPatterns {
    /// Pre-pass over all games, independent of color bucketing.
    pub fn scan(records: &[GameRecord]) -> Self {
        let mut patterns = Self::default();
        for rec in records {
            if rec.player_result != PlayerResult::Loss {
                continue;
            }
            *patterns.losses.entry(rec.eco.clone()).or_insert(0) += 1;
            if rec.moves.len() < QUICK_LOSS_PLIES {
                *patterns.quick_losses.entry(rec.eco.clone()).or_insert(0) += 1;
            }
        }
        patterns
    }

    pub fn quick_loss_count(&self, eco: &str) -> usize {
        self.quick_losses.get(eco).copied().unwrap_or(0)
    }

    pub fn loss_count(&self, eco: &str) -> usize {
        self.losses.get(eco).copied().unwrap_or(0)
    }
}

/// Group games into (ECO, color) buckets, preserving first-seen order.
pub fn bucket_games(records: &[GameRecord]) -> Vec<OpeningBucket> {
    let mut buckets: Vec<OpeningBucket> = Vec::new();
    let mut index: HashMap<(String, PlayerColor), usize> = HashMap::new();

    for rec in records {
        let key = (rec.eco.clone(), rec.target_color);
        let idx = *index.entry(key).or_insert_with(|| {
            buckets.push(OpeningBucket {
                eco: rec.eco.clone(),
                opening_name: rec.opening_name.clone(),
                color: rec.target_color,
                wins: 0,
                losses: 0,
                draws: 0,
            });
            buckets.len() - 1
        });

        match rec.player_result {
            PlayerResult::Win => buckets[idx].wins += 1,
            PlayerResult::Loss => buckets[idx].losses += 1,
            PlayerResult::Draw => buckets[idx].draws += 1,
        }
    }

    buckets
}

/// Composite weakness score for one bucket, in [0, 100].
///
/// Base score is the win-rate deficit; inexperience, quick-loss and
/// repetitive-loss penalties are added on top, then capped. The
/// quick-loss and repetitive-loss penalties both key on the same ECO
/// and can fire for the same underlying games. That compounding is
/// intentional and must not be deduplicated without a product decision
/// (see DESIGN.md).
pub fn weakness_score(bucket: &OpeningBucket, patterns: &LossPatterns) -> f64 {
    let total = bucket.total_games();
    let win_rate = bucket.wins as f64 / total as f64;
    let mut score = (1.0 - win_rate) * 100.0;

    if total < 3 {
        score += INEXPERIENCE_PENALTY_HARD;
    } else if total < 5 {
        score += INEXPERIENCE_PENALTY_SOFT;
    }

    score += patterns.quick_loss_count(&bucket.eco) as f64 * QUICK_LOSS_PENALTY;

    if patterns.loss_count(&bucket.eco) >= 2 {
        score += REPETITIVE_LOSS_PENALTY;
    }

    score.min(MAX_WEAKNESS_SCORE)
}

fn entry_for(bucket: &OpeningBucket, patterns: &LossPatterns) -> WeaknessEntry {
    WeaknessEntry {
        eco: bucket.eco.clone(),
        opening_name: bucket.opening_name.clone(),
        color: bucket.color,
        total_games: bucket.total_games(),
        wins: bucket.wins,
        losses: bucket.losses,
        draws: bucket.draws,
        win_rate: bucket.win_rate(),
        weakness_score: weakness_score(bucket, patterns),
    }
}

/// Full weakness ranking: every bucket scored, worst first.
/// Stable sort — ties retain bucket insertion order.
pub fn weakness_report(records: &[GameRecord]) -> Vec<WeaknessEntry> {
    let patterns = LossPatterns::scan(records);
    let mut entries: Vec<WeaknessEntry> = bucket_games(records)
        .iter()
        .map(|b| entry_for(b, &patterns))
        .collect();

    entries.sort_by(|a, b| {
        b.weakness_score
            .partial_cmp(&a.weakness_score)
            .unwrap_or(Ordering::Equal)
    });
    entries
}

/// Coarser win-rate-only screen: buckets with at least 3 games and a
/// win rate under 40% or a loss rate over 60%, sorted by win rate
/// ascending. Serves different callers than the full ranking.
pub fn simple_weaknesses(records: &[GameRecord]) -> Vec<WeaknessEntry> {
    let patterns = LossPatterns::scan(records);
    let mut entries: Vec<WeaknessEntry> = bucket_games(records)
        .iter()
        .filter(|b| {
            b.total_games() >= SIMPLE_FILTER_MIN_GAMES
                && (b.win_rate() < SIMPLE_FILTER_MAX_WIN_RATE
                    || b.loss_rate() > SIMPLE_FILTER_MIN_LOSS_RATE)
        })
        .map(|b| entry_for(b, &patterns))
        .collect();

    entries.sort_by(|a, b| {
        a.win_rate
            .partial_cmp(&b.win_rate)
            .unwrap_or(Ordering::Equal)
    });
    entries
}

/// JSON projection of a report for downstream consumers.
pub fn report_to_json(entries: &[WeaknessEntry]) -> JsonValue {
    serde_json::to_value(entries).unwrap_or(JsonValue::Array(vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(eco: &str, color: PlayerColor, result: PlayerResult, plies: usize) -> GameRecord {
        let (raw, white, black) = match (color, result) {
            (PlayerColor::White, PlayerResult::Win) => ("1-0", "bob", "opponent"),
            (PlayerColor::White, PlayerResult::Loss) => ("0-1", "bob", "opponent"),
            (PlayerColor::Black, PlayerResult::Win) => ("0-1", "opponent", "bob"),
            (PlayerColor::Black, PlayerResult::Loss) => ("1-0", "opponent", "bob"),
            (_, PlayerResult::Draw) => ("1/2-1/2", "bob", "opponent"),
        };
        GameRecord {
            white: white.to_string(),
            black: black.to_string(),
            target_color: color,
            result: raw.to_string(),
            player_result: result,
            eco: eco.to_string(),
            opening_name: format!("ECO {eco} unknown"),
            moves: vec!["e4".to_string(); plies],
        }
    }

    #[test]
    fn test_bucket_counts_sum_to_total() {
        let records = vec![
            record("B01", PlayerColor::White, PlayerResult::Win, 40),
            record("B01", PlayerColor::White, PlayerResult::Loss, 40),
            record("B01", PlayerColor::White, PlayerResult::Draw, 40),
            record("C55", PlayerColor::Black, PlayerResult::Loss, 40),
        ];
        for bucket in bucket_games(&records) {
            assert_eq!(
                bucket.wins + bucket.losses + bucket.draws,
                bucket.total_games()
            );
        }
    }

    #[test]
    fn test_score_bounds_for_arbitrary_input() {
        let records = vec![
            record("B01", PlayerColor::White, PlayerResult::Loss, 10),
            record("B01", PlayerColor::White, PlayerResult::Loss, 12),
            record("B01", PlayerColor::Black, PlayerResult::Loss, 14),
            record("C55", PlayerColor::White, PlayerResult::Win, 60),
        ];
        for entry in weakness_report(&records) {
            assert!(entry.weakness_score >= 0.0 && entry.weakness_score <= 100.0);
            assert!(entry.win_rate >= 0.0 && entry.win_rate <= 100.0);
        }
    }

    #[test]
    fn test_low_win_rate_drives_base_score() {
        // 5 games as White in B01, 1 win 4 losses, none quick.
        let mut records = vec![record("B01", PlayerColor::White, PlayerResult::Win, 60)];
        for _ in 0..4 {
            records.push(record("B01", PlayerColor::White, PlayerResult::Loss, 60));
        }

        let report = weakness_report(&records);
        assert_eq!(report.len(), 1);
        let entry = &report[0];
        assert!((entry.win_rate - 20.0).abs() < 1e-9);
        // Base 80, no inexperience penalty, no quick losses, but 4 losses
        // in the opening trigger the repetitive-loss penalty.
        assert!((entry.weakness_score - 100.0_f64.min(80.0 + 25.0)).abs() < 1e-9);

        let simple = simple_weaknesses(&records);
        assert_eq!(simple.len(), 1, "winRate 20 < 40 must pass the filter");
    }

    #[test]
    fn test_quick_and_repetitive_losses_stack() {
        // 2 games as Black in C55, both lost, one in 18 plies.
        let records = vec![
            record("C55", PlayerColor::Black, PlayerResult::Loss, 18),
            record("C55", PlayerColor::Black, PlayerResult::Loss, 52),
        ];

        let report = weakness_report(&records);
        let entry = &report[0];
        // Base 100 + 20 (under 3 games) + 15 (one quick loss) + 25
        // (two losses) = 160, capped at 100. The quick-loss and
        // repetitive-loss penalties both fire for the same games.
        assert_eq!(entry.weakness_score, 100.0);
        assert_eq!(entry.total_games, 2);
    }

    #[test]
    fn test_quick_losses_shared_across_color_buckets() {
        // A quick loss as Black also raises the White bucket of the
        // same ECO: the pre-pass keys on opening only.
        let records = vec![
            record("B01", PlayerColor::Black, PlayerResult::Loss, 18),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
        ];

        let report = weakness_report(&records);
        let white = report
            .iter()
            .find(|e| e.color == PlayerColor::White)
            .unwrap();
        // Base 0 (all wins) + 15 from the black-side quick loss.
        assert!((white.weakness_score - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_in_losses() {
        // Moving a game from win to loss never decreases the score.
        let base = vec![
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
            record("B01", PlayerColor::White, PlayerResult::Win, 60),
        ];
        let mut prev_score = weakness_report(&base)[0].weakness_score;

        for flipped in 1..=5 {
            let mut records = base.clone();
            for rec in records.iter_mut().take(flipped) {
                *rec = record("B01", PlayerColor::White, PlayerResult::Loss, 60);
            }
            let score = weakness_report(&records)[0].weakness_score;
            assert!(score >= prev_score, "score dropped when a win became a loss");
            prev_score = score;
        }
    }

    #[test]
    fn test_report_is_deterministic() {
        let records = vec![
            record("B01", PlayerColor::White, PlayerResult::Loss, 20),
            record("C55", PlayerColor::Black, PlayerResult::Loss, 20),
            record("A45", PlayerColor::White, PlayerResult::Win, 50),
        ];
        let first = weakness_report(&records);
        let second = weakness_report(&records);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.eco, b.eco);
            assert_eq!(a.color, b.color);
            assert_eq!(a.weakness_score, b.weakness_score);
        }
    }

    #[test]
    fn test_simple_filter_exact_boundaries() {
        // 2 games: below the minimum sample size, excluded regardless of record.
        let two_losses = vec![
            record("B01", PlayerColor::White, PlayerResult::Loss, 60),
            record("B01", PlayerColor::White, PlayerResult::Loss, 60),
        ];
        assert!(simple_weaknesses(&two_losses).is_empty());

        // 5 games, 2 wins (40% win rate), 2 losses (40% loss rate):
        // neither condition holds, excluded.
        let healthy = vec![
            record("C55", PlayerColor::White, PlayerResult::Win, 60),
            record("C55", PlayerColor::White, PlayerResult::Win, 60),
            record("C55", PlayerColor::White, PlayerResult::Loss, 60),
            record("C55", PlayerColor::White, PlayerResult::Loss, 60),
            record("C55", PlayerColor::White, PlayerResult::Draw, 60),
        ];
        assert!(simple_weaknesses(&healthy).is_empty());

        // 3 games all lost: both conditions hold, included.
        let weak = vec![
            record("A45", PlayerColor::Black, PlayerResult::Loss, 60),
            record("A45", PlayerColor::Black, PlayerResult::Loss, 60),
            record("A45", PlayerColor::Black, PlayerResult::Loss, 60),
        ];
        let entries = simple_weaknesses(&weak);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].eco, "A45");

        // High draw rate with >60% losses: win-rate condition alone
        // would miss it, loss-rate condition catches it.
        let drawish = vec![
            record("B22", PlayerColor::White, PlayerResult::Loss, 60),
            record("B22", PlayerColor::White, PlayerResult::Loss, 60),
            record("B22", PlayerColor::White, PlayerResult::Loss, 60),
            record("B22", PlayerColor::White, PlayerResult::Win, 60),
        ];
        assert_eq!(simple_weaknesses(&drawish).len(), 1);
    }

    #[test]
    fn test_simple_filter_sorted_by_win_rate_ascending() {
        let mut records = Vec::new();
        // B01: 0/3
        for _ in 0..3 {
            records.push(record("B01", PlayerColor::White, PlayerResult::Loss, 60));
        }
        // C55: 1/3
        records.push(record("C55", PlayerColor::Black, PlayerResult::Win, 60));
        records.push(record("C55", PlayerColor::Black, PlayerResult::Loss, 60));
        records.push(record("C55", PlayerColor::Black, PlayerResult::Loss, 60));

        let entries = simple_weaknesses(&records);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].eco, "B01");
        assert_eq!(entries[1].eco, "C55");
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        assert!(weakness_report(&[]).is_empty());
        assert!(simple_weaknesses(&[]).is_empty());
    }

    #[test]
    fn test_json_projection_field_names() {
        let records = vec![record("B01", PlayerColor::White, PlayerResult::Loss, 20)];
        let json = report_to_json(&weakness_report(&records));
        let row = &json[0];
        assert_eq!(row["eco"], "B01");
        assert!(row["winRate"].is_number());
        assert!(row["weaknessScore"].is_number());
        assert_eq!(row["color"], "white");
    }
}
