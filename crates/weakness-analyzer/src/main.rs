//! Opening weakness analyzer
//!
//! Downloads a player's games from Chess.com and/or Lichess, ranks
//! opening weaknesses, runs Stockfish move-quality analysis when the
//! engine is available, and asks a local Ollama model for preparation
//! advice against the detected weaknesses.

use tracing::info;

use chess_core::classify;
use chess_core::game_data::GameRecord;
use chess_core::weakness;

use weakness_analyzer::clients::{self, Platform};
use weakness_analyzer::config::AnalyzerConfig;
use weakness_analyzer::moves::MoveAnalyzer;
use weakness_analyzer::ollama::StrategyGenerator;
use weakness_analyzer::report;

struct CliArgs {
    username: String,
    platform: Platform,
    pgn_file: Option<String>,
    max_games: Option<usize>,
    top: usize,
    skip_strategy: bool,
    no_engine: bool,
}

const USAGE: &str = "Usage: weakness-analyzer <username> \
[--platform chesscom|lichess|both] [--pgn-file PATH] [--max-games N] \
[--top N] [--skip-strategy] [--no-engine]";

fn parse_args() -> Result<CliArgs, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut username = None;
    let mut platform = Platform::Both;
    let mut pgn_file = None;
    let mut max_games = None;
    let mut top = 8;
    let mut skip_strategy = false;
    let mut no_engine = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--platform" => {
                let value = args.get(i + 1).ok_or("--platform needs a value")?;
                platform = Platform::parse(value)
                    .ok_or_else(|| format!("Unknown platform: {value}"))?;
                i += 2;
            }
            "--pgn-file" => {
                let value = args.get(i + 1).ok_or("--pgn-file needs a value")?;
                pgn_file = Some(value.to_string());
                i += 2;
            }
            "--max-games" => {
                let value = args.get(i + 1).ok_or("--max-games needs a value")?;
                max_games = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid --max-games: {value}"))?,
                );
                i += 2;
            }
            "--top" => {
                let value = args.get(i + 1).ok_or("--top needs a value")?;
                top = value
                    .parse()
                    .map_err(|_| format!("Invalid --top: {value}"))?;
                i += 2;
            }
            "--skip-strategy" => {
                skip_strategy = true;
                i += 1;
            }
            "--no-engine" => {
                no_engine = true;
                i += 1;
            }
            arg if username.is_none() && !arg.starts_with("--") => {
                username = Some(arg.to_string());
                i += 1;
            }
            arg => return Err(format!("Unexpected argument: {arg}")),
        }
    }

    Ok(CliArgs {
        username: username.ok_or("Missing username")?,
        platform,
        pgn_file,
        max_games,
        top,
        skip_strategy,
        no_engine,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(1);
        }
    };

    let config = AnalyzerConfig::load()?;
    let max_games = args.max_games.unwrap_or(config.max_games);
    info!(
        username = %args.username,
        max_games,
        ply_cap = config.analysis_ply_cap,
        "Starting analysis"
    );

    // Stage 1: game ingestion, from a local PGN dump or the platform APIs
    let games = match &args.pgn_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let games = chess_core::pgn::parse_pgn_collection(&text);
            info!(path = %path, parsed = games.len(), "Parsed PGN file");
            games
        }
        None => clients::fetch_games(args.platform, &args.username, max_games).await?,
    };

    // Stage 2: per-game classification. Games where the username
    // matches neither player are filtered, not errors.
    let records: Vec<GameRecord> = games
        .iter()
        .filter_map(|g| classify::classify_game(g, &args.username))
        .collect();
    info!(
        classified = records.len(),
        fetched = games.len(),
        "Classified games"
    );

    // Stage 3: move-quality analysis (engine or heuristic)
    let mut analyzer = if args.no_engine {
        info!("Engine disabled by flag, using heuristic move analysis");
        MoveAnalyzer::Heuristic
    } else {
        MoveAnalyzer::select(&config).await
    };
    let stats = analyzer.analyze_games(&records, &config).await;
    info!(
        games = stats.games_analyzed,
        blunders = stats.counts.blunders,
        engine = analyzer.is_engine(),
        "Move-quality analysis complete"
    );
    analyzer.shutdown().await;

    // Stage 4: weakness aggregation and scoring
    let ranked = weakness::weakness_report(&records);
    let simple = weakness::simple_weaknesses(&records);

    println!(
        "{}",
        report::format_report(&args.username, &ranked, &simple, Some(&stats), args.top)
    );

    if !args.skip_strategy && !ranked.is_empty() {
        let generator = StrategyGenerator::select(&config).await;
        let prompt = report::build_strategy_prompt(&args.username, &ranked, args.top);
        let strategy = generator.generate_strategy(&prompt).await;
        println!("{}", "=".repeat(60));
        println!("Suggested preparation");
        println!("{}", "=".repeat(60));
        println!("{strategy}");
    }

    Ok(())
}
