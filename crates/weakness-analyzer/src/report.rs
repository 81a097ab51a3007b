//! Terminal report and LLM prompt formatting.
//!
//! The wording here is template text; the real interface is the
//! WeaknessEntry data it renders.

use std::fmt::Write;

use chess_core::weakness::WeaknessEntry;

use crate::moves::TacticalStats;

/// Plain-text block describing the top weaknesses, used both as the
/// LLM prompt payload and inside the terminal report.
pub fn build_strategy_prompt(username: &str, entries: &[WeaknessEntry], top_n: usize) -> String {
    let mut text = format!("Chess Player Analysis: {username}\n\nOpening weaknesses:\n");

    for (i, entry) in entries.iter().take(top_n).enumerate() {
        let _ = writeln!(
            text,
            "{}. {} ({}) as {} — {:.1}% win rate over {} games (score {:.1}/100)",
            i + 1,
            entry.opening_name,
            entry.eco,
            entry.color.as_str(),
            entry.win_rate,
            entry.total_games,
            entry.weakness_score,
        );
    }

    if entries.is_empty() {
        text.push_str("No significant opening weaknesses detected.\n");
    }

    text
}

/// Full terminal report: ranked weaknesses plus tactical aggregates.
pub fn format_report(
    username: &str,
    ranked: &[WeaknessEntry],
    simple: &[WeaknessEntry],
    stats: Option<&TacticalStats>,
    top_n: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "Weakness analysis for {username}");
    let _ = writeln!(out, "{}", "=".repeat(60));

    if ranked.is_empty() {
        let _ = writeln!(out, "\nNo games found for this player.");
        return out;
    }

    let _ = writeln!(out, "\nTop weaknesses by composite score:");
    for (i, entry) in ranked.iter().take(top_n).enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} ({}) as {}",
            i + 1,
            entry.opening_name,
            entry.eco,
            entry.color.as_str(),
        );
        let _ = writeln!(
            out,
            "     Weakness score: {:.1}/100  Record: {}-{}-{} ({:.1}% win rate, {} games)",
            entry.weakness_score,
            entry.wins,
            entry.losses,
            entry.draws,
            entry.win_rate,
            entry.total_games,
        );
    }

    if simple.is_empty() {
        let _ = writeln!(out, "\nNo openings fail the plain win-rate screen.");
    } else {
        let _ = writeln!(out, "\nLow win-rate openings (3+ games):");
        for entry in simple.iter().take(top_n) {
            let _ = writeln!(
                out,
                "  - {} ({}) as {}: {:.1}% over {} games",
                entry.opening_name,
                entry.eco,
                entry.color.as_str(),
                entry.win_rate,
                entry.total_games,
            );
        }
    }

    if let Some(stats) = stats {
        let _ = writeln!(out, "\nTactical analysis ({} games):", stats.games_analyzed);
        let _ = writeln!(
            out,
            "  Blunders: {}  Mistakes: {}  Inaccuracies: {}",
            stats.counts.blunders, stats.counts.mistakes, stats.counts.inaccuracies,
        );
        let _ = writeln!(
            out,
            "  Average centipawn loss: {:.1}",
            stats.avg_centipawn_loss
        );

        if !stats.per_opening.is_empty() {
            let mut rows: Vec<_> = stats.per_opening.iter().collect();
            // Worst openings first, ECO as tiebreak for stable output.
            rows.sort_by(|a, b| {
                (b.1.blunders + b.1.mistakes)
                    .cmp(&(a.1.blunders + a.1.mistakes))
                    .then(a.0.cmp(b.0))
            });
            let _ = writeln!(out, "  Errors by opening:");
            for (eco, errors) in rows {
                let _ = writeln!(
                    out,
                    "    {}: {} blunders, {} mistakes, {} inaccuracies over {} games",
                    eco, errors.blunders, errors.mistakes, errors.inaccuracies, errors.games,
                );
            }
        }
    }

    out
}
