use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use pbp_cli::files::{load_game, load_options, write_game_outputs};
use pbp_core::process_games;
use pbp_ingest::{discover_games, read_roster_csv};
use pbp_model::{BatchReport, GameId, SkippedGame};

use crate::cli::ReconcileArgs;
use crate::types::RunResult;

fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
    {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar.set_message(message);
    bar
}

pub fn run_reconcile(args: &ReconcileArgs) -> Result<RunResult> {
    let input_dir = &args.input_dir;
    let run_span = info_span!("reconcile", input_dir = %input_dir.display());
    let _run_guard = run_span.enter();

    // =========================================================================
    // Stage 1: Options, roster and payload discovery
    // =========================================================================
    let options = load_options(args.config.as_deref(), args.strict)?;
    let roster = read_roster_csv(&args.roster)
        .with_context(|| format!("load roster {}", args.roster.display()))?;
    let discovered = discover_games(input_dir)
        .with_context(|| format!("discover games in {}", input_dir.display()))?;
    info!(
        games = discovered.len(),
        roster_players = roster.len(),
        "discovered games"
    );

    // =========================================================================
    // Stage 2: Load payloads; unreadable games are skipped
    // =========================================================================
    let mut inputs = Vec::with_capacity(discovered.len());
    let mut skipped = Vec::new();
    let mut load_failures = Vec::new();
    let loading = progress_bar(discovered.len(), "loading");
    for files in &discovered {
        match load_game(files) {
            Ok(input) => inputs.push(input),
            Err(error) => {
                let reason = format!("{error:#}");
                warn!(game = %files.stem, error = %reason, "failed to load game");
                match files.stem.parse::<GameId>() {
                    Ok(game_id) => skipped.push(SkippedGame { game_id, reason }),
                    Err(_) => load_failures.push(format!("{}: {reason}", files.stem)),
                }
            }
        }
        loading.inc(1);
    }
    loading.finish_and_clear();

    // =========================================================================
    // Stage 3: Reconcile on the worker pool
    // =========================================================================
    let reconcile_start = Instant::now();
    let report = process_games(&inputs, &roster, &options);
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        duration_ms = reconcile_start.elapsed().as_millis(),
        "reconcile complete"
    );

    // =========================================================================
    // Stage 4: Output
    // =========================================================================
    let output_dir = if args.dry_run {
        info!("dry run, no files written");
        None
    } else {
        let dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| input_dir.join("output"));
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let writing = progress_bar(report.games.len(), "writing");
        let write_failures = write_game_outputs(&report.games, &dir, &writing);
        writing.finish_and_clear();
        skipped.extend(write_failures);
        Some(dir)
    };

    skipped.extend(report.skipped);
    let summaries = report
        .games
        .into_iter()
        .filter(|game| !skipped.iter().any(|skip| skip.game_id == game.game_id))
        .map(|game| game.summary)
        .collect();
    Ok(RunResult {
        input_dir: input_dir.clone(),
        output_dir,
        report: BatchReport::new(summaries, skipped),
        load_failures,
    })
}
