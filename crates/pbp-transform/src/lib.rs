//! Event normalization stages.
//!
//! Stages run in order: schema alignment, semantic mapping, participant
//! attribution, coordinate normalization. Each takes its input by reference
//! and returns a new, derived set of rows.

pub mod attribution;
pub mod clock;
pub mod coordinates;
pub mod schema;
pub mod semantics;
pub mod situation;

pub use attribution::{
    AttributedEvents, ParticipantSlots, attribute, attribute_events, unresolved_slots,
};
pub use clock::{derive_clock, parse_clock, period_length, period_offset};
pub use coordinates::{
    NormalizedEvents, defending_side_sign, normalize_coordinates, shot_angle, shot_distance,
};
pub use schema::{
    AlignedFrame, FieldType, SchemaField, TargetSchema, align_and_cast, raw_event_schema,
};
pub use semantics::{MappedEvents, SemanticsStats, map_events, map_shot_type};
pub use situation::{forward_fill_codes, parse_situation_code};
