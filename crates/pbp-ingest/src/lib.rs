pub mod discovery;
pub mod error;
pub mod frame;
pub mod play_by_play;
pub mod roster_csv;
pub mod shift_chart;

pub use discovery::{GameFiles, PLAY_BY_PLAY_SUFFIX, SHIFT_CHART_SUFFIX, discover_games};
pub use error::{IngestError, Result};
pub use frame::{JsonKind, infer_kind, json_column};
pub use play_by_play::{
    IGNORED_DETAIL_KEYS, IGNORED_PLAY_KEYS, KNOWN_DETAIL_KEYS, RawGame, flatten_play_by_play,
    parse_play_by_play, read_play_by_play,
};
pub use roster_csv::read_roster_csv;
pub use shift_chart::{parse_shift_chart, read_shift_chart};
