//! Table data: matchup, penalty, time-keeping and deck catalog.
//!
//! All tables are validated at load time. A `TableStore` that loaded without
//! error is safe to resolve against; lookups that still fail at runtime are
//! authoring defects and surface as fatal `EngineError`s.

pub mod decks;
pub mod embedded;
pub mod matchup;
pub mod penalty;
pub mod timekeeping;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{EngineError, SchemaError};

pub use decks::{CardType, Deck, DeckCatalog, PlayCard};
pub use matchup::{
    ClockBucket, DiceOutcome, DoublesResult, MatchupKey, MatchupMeta, MatchupTable, ReturnTo,
    Turnover, TurnoverKind,
};
pub use penalty::{PenaltyEntry, PenaltySide, PenaltyTable};
pub use timekeeping::{TimeEvent, TimeKeeping, TimeKeepingSource};

pub const DECKS_FILE: &str = "decks.json";
pub const TIMEKEEPING_FILE: &str = "timekeeping.json";
pub const PENALTIES_DIR: &str = "penalties";
pub const MATCHUPS_DIR: &str = "matchups";

#[derive(Debug, Clone, Default)]
pub struct TableStore {
    matchups: HashMap<MatchupKey, MatchupTable>,
    penalties: BTreeMap<String, PenaltyTable>,
    timekeeping: TimeKeeping,
    catalog: DeckCatalog,
}

impl TableStore {
    /// Empty store with default time-keeping. Mostly useful for tests.
    pub fn new(catalog: DeckCatalog, timekeeping: TimeKeeping) -> Self {
        Self { matchups: HashMap::new(), penalties: BTreeMap::new(), timekeeping, catalog }
    }

    /// Tables compiled into the binary.
    pub fn embedded() -> Result<Self, SchemaError> {
        let catalog = DeckCatalog::from_json(DECKS_FILE, embedded::DECKS_JSON)?;
        let timekeeping = TimeKeeping::from_json(TIMEKEEPING_FILE, embedded::TIMEKEEPING_JSON)?;
        let mut store = Self::new(catalog, timekeeping);
        for (file, json) in embedded::PENALTY_TABLES {
            store.insert_penalty_table(PenaltyTable::from_json(file, json)?);
        }
        for (file, json) in embedded::MATCHUP_TABLES {
            store.insert_matchup(file, MatchupTable::from_json(file, json)?)?;
        }
        store.validate_references()?;
        debug!(matchups = store.matchups.len(), "embedded tables loaded");
        Ok(store)
    }

    /// Load a table directory laid out like `data/tables/`.
    ///
    /// `timekeeping.json` is optional; defaults are used when it is absent.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let dir = dir.as_ref();

        let catalog = DeckCatalog::from_json(DECKS_FILE, &read(&dir.join(DECKS_FILE))?)?;
        let tk_path = dir.join(TIMEKEEPING_FILE);
        let timekeeping = if tk_path.exists() {
            TimeKeeping::from_json(TIMEKEEPING_FILE, &read(&tk_path)?)?
        } else {
            warn!(dir = %dir.display(), "no timekeeping.json; using default runoffs");
            TimeKeeping::default()
        };

        let mut store = Self::new(catalog, timekeeping);
        for (file, json) in read_json_files(&dir.join(PENALTIES_DIR))? {
            store.insert_penalty_table(PenaltyTable::from_json(&file, &json)?);
        }
        for (file, json) in read_json_files(&dir.join(MATCHUPS_DIR))? {
            let table = MatchupTable::from_json(&file, &json)?;
            store.insert_matchup(&file, table)?;
        }
        store.validate_references()?;

        info!(
            dir = %dir.display(),
            matchups = store.matchups.len(),
            penalties = store.penalties.len(),
            "tables loaded"
        );
        Ok(store)
    }

    pub fn insert_penalty_table(&mut self, table: PenaltyTable) {
        self.penalties.insert(table.name.clone(), table);
    }

    /// Fails if another file already defined the same matchup.
    pub fn insert_matchup(&mut self, file: &str, table: MatchupTable) -> Result<(), SchemaError> {
        if self.matchups.contains_key(&table.key) {
            return Err(SchemaError::field(
                file,
                "offense",
                format!("duplicate matchup {}", table.key),
            ));
        }
        self.matchups.insert(table.key.clone(), table);
        Ok(())
    }

    /// Cross-file checks: penalty references resolve and every matchup names
    /// a catalogued scrimmage card and defense.
    pub fn validate_references(&self) -> Result<(), SchemaError> {
        let mut keys: Vec<_> = self.matchups.keys().collect();
        keys.sort();
        for key in keys {
            let table = &self.matchups[key];
            let file = format!("{}/{}", MATCHUPS_DIR, key);
            let reference = &table.doubles.penalty_table_ref;
            if !self.penalties.contains_key(reference) {
                return Err(SchemaError::field(
                    &file,
                    "doubles.2-19.penalty_table_ref",
                    format!("unknown penalty table '{}'", reference),
                ));
            }
            match self.catalog.card_type(&key.deck, &key.play) {
                Some(card_type) if card_type.is_scrimmage() => {}
                Some(card_type) => {
                    return Err(SchemaError::field(
                        &file,
                        "offense.play",
                        format!("{:?} cards do not use matchup tables", card_type),
                    ))
                }
                None => {
                    return Err(SchemaError::field(
                        &file,
                        "offense",
                        format!("{} is not in the deck catalog", key.offense_card()),
                    ))
                }
            }
            if !self.catalog.has_defense(&key.defense) {
                return Err(SchemaError::field(
                    &file,
                    "defense",
                    format!("unknown defense '{}'", key.defense),
                ));
            }
        }
        Ok(())
    }

    pub fn matchup(&self, deck: &str, play: &str, defense: &str) -> Option<&MatchupTable> {
        self.matchups.get(&MatchupKey::new(deck, play, defense))
    }

    pub fn penalty_table(&self, name: &str) -> Result<&PenaltyTable, EngineError> {
        self.penalties
            .get(name)
            .ok_or_else(|| EngineError::MissingPenaltyTable(name.to_string()))
    }

    pub fn timekeeping(&self) -> &TimeKeeping {
        &self.timekeeping
    }

    pub fn catalog(&self) -> &DeckCatalog {
        &self.catalog
    }

    pub fn matchup_count(&self) -> usize {
        self.matchups.len()
    }

    pub fn matchup_keys(&self) -> impl Iterator<Item = &MatchupKey> {
        self.matchups.keys()
    }
}

fn read(path: &Path) -> Result<String, SchemaError> {
    fs::read_to_string(path)
        .map_err(|source| SchemaError::Io { file: path.display().to_string(), source })
}

/// `*.json` files in `dir`, sorted by name, as (relative file label, contents).
fn read_json_files(dir: &Path) -> Result<Vec<(String, String)>, SchemaError> {
    let parent = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let entries = fs::read_dir(dir)
        .map_err(|source| SchemaError::Io { file: dir.display().to_string(), source })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|source| SchemaError::Io { file: dir.display().to_string(), source })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            Ok((format!("{}/{}", parent, name), read(&path)?))
        })
        .collect()
}
