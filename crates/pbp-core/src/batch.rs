//! Multi-game batches.

use rayon::prelude::*;
use tracing::{info, warn};

use pbp_model::{BatchReport, ReconcileOptions, RosterLookup, SkippedGame};

use crate::game::{GameInput, GameOutput, process_game};

/// Reconcile every game on the rayon pool.
///
/// A failing game becomes a [`SkippedGame`] carrying the full error chain and
/// never affects the others. Output order follows input order.
pub fn process_games(
    inputs: &[GameInput],
    roster: &RosterLookup,
    options: &ReconcileOptions,
) -> BatchReport<GameOutput> {
    let results: Vec<_> = inputs
        .par_iter()
        .map(|input| (input.game_id, process_game(input, roster, options)))
        .collect();

    let mut games = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (game_id, result) in results {
        match result {
            Ok(output) => games.push(output),
            Err(err) => {
                warn!(game_id = %game_id, error = %format!("{err:#}"), "skipping game");
                skipped.push(SkippedGame {
                    game_id,
                    reason: format!("{err:#}"),
                });
            }
        }
    }

    info!(
        succeeded = games.len(),
        skipped = skipped.len(),
        "batch complete"
    );
    BatchReport::new(games, skipped)
}
