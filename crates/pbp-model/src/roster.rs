//! Read-only roster lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::{Hand, PositionClass};
use crate::ids::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    pub name: Option<String>,
    pub position: PositionClass,
    pub hand: Option<Hand>,
}

/// Player id → roster entry. Later entries for the same id replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct RosterLookup {
    entries: HashMap<PlayerId, RosterEntry>,
}

impl RosterLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: RosterEntry) {
        self.entries.insert(entry.player_id, entry);
    }

    pub fn get(&self, player: PlayerId) -> Option<&RosterEntry> {
        self.entries.get(&player)
    }

    pub fn position_of(&self, player: PlayerId) -> Option<PositionClass> {
        self.entries.get(&player).map(|entry| entry.position)
    }

    pub fn name_of(&self, player: PlayerId) -> Option<&str> {
        self.entries
            .get(&player)
            .and_then(|entry| entry.name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RosterEntry> for RosterLookup {
    fn from_iter<I: IntoIterator<Item = RosterEntry>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for entry in iter {
            lookup.insert(entry);
        }
        lookup
    }
}
