//! Shift indexing, on-ice joins, and the per-game reconciliation pipeline.

pub mod batch;
pub mod frame_builder;
pub mod game;
pub mod on_ice;
pub mod pipeline;
pub mod shift_index;
pub mod validate;

pub use batch::process_games;
pub use frame_builder::build_event_frame;
pub use game::{GameInput, GameOutput, game_teams, process_game};
pub use on_ice::{OnIcePlayer, OnIceRoster, TimelineEvent, join_on_ice, resolve_active, roster_at};
pub use pipeline::{
    AttributionStep, CoordinateStep, EventPipeline, EventStep, OrderCheckStep, PipelineState,
    build_default_pipeline,
};
pub use shift_index::{ParsedShifts, ShiftIndex, SlotKey, merge_intervals, parse_shifts};
pub use validate::validate_event_order;
