use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::core::error::{Error, Result};

/// Letters eligible as grab shortcuts.
pub const ALPHABET: RangeInclusive<char> = 'a'..='z';

/// Duration assigned to a freshly added shortcut.
pub const NEW_KEY_SECONDS: u32 = 10;

/// Mapping from a single lowercase letter to a clip duration in seconds.
///
/// Invariant: every key is one of the 26 lowercase ASCII letters and every
/// duration is at least 1. `KeyMapStore::load` rejects files that violate
/// this; the settings editor cannot produce violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyMap(BTreeMap<char, u32>);

impl Default for KeyMap {
    fn default() -> Self {
        KeyMap(BTreeMap::from([('s', 8), ('m', 16), ('l', 24)]))
    }
}

impl FromIterator<(char, u32)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (char, u32)>>(iter: I) -> Self {
        KeyMap(iter.into_iter().collect())
    }
}

impl KeyMap {
    pub fn duration_for(&self, key: char) -> Option<u32> {
        self.0.get(&key).copied()
    }

    pub fn contains(&self, key: char) -> bool {
        self.0.contains_key(&key)
    }

    pub fn insert(&mut self, key: char, seconds: u32) {
        self.0.insert(key, seconds);
    }

    pub fn remove(&mut self, key: char) -> Option<u32> {
        self.0.remove(&key)
    }

    pub fn get_mut(&mut self, key: char) -> Option<&mut u32> {
        self.0.get_mut(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entries in alphabetical key order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.0.iter().map(|(&key, &seconds)| (key, seconds))
    }

    /// First letter of the alphabet not yet bound to a duration.
    pub fn next_free_letter(&self) -> Option<char> {
        ALPHABET.find(|letter| !self.0.contains_key(letter))
    }

    /// All letters not yet bound, in alphabetical order.
    pub fn free_letters(&self) -> Vec<char> {
        ALPHABET.filter(|letter| !self.0.contains_key(letter)).collect()
    }
}

/// Loads and saves the key map as a JSON object in the working directory.
pub struct KeyMapStore {
    path: PathBuf,
}

impl KeyMapStore {
    pub const SETTINGS_FILE: &'static str = ".ezygrabrc";

    pub fn new() -> Self {
        Self::at(PathBuf::from(Self::SETTINGS_FILE))
    }

    pub fn at(path: PathBuf) -> Self {
        KeyMapStore { path }
    }

    /// Reads the settings file. A missing or unreadable file yields the
    /// default map; a file that opens but does not parse as a valid key map
    /// is reported as `Error::Config`.
    pub fn load(&self) -> Result<KeyMap> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                log::info!(
                    "Could not open settings at {} ({}), using defaults",
                    self.path.display(),
                    e
                );
                return Ok(KeyMap::default());
            }
        };

        let raw: BTreeMap<String, u32> = serde_json::from_str(&content)
            .map_err(|e| self.config_error(e.to_string()))?;

        let mut map = BTreeMap::new();
        for (key, seconds) in raw {
            let mut chars = key.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(letter), None) if letter.is_ascii_lowercase() => letter,
                _ => return Err(self.config_error(format!("invalid shortcut key {:?}", key))),
            };
            if seconds == 0 {
                return Err(self.config_error(format!("zero duration for key '{}'", letter)));
            }
            map.insert(letter, seconds);
        }

        log::info!("Loaded {} grab keys from {}", map.len(), self.path.display());
        Ok(KeyMap(map))
    }

    /// Writes the map back as pretty JSON. Single attempt, no retries.
    pub fn save(&self, map: &KeyMap) -> Result<()> {
        let content =
            serde_json::to_string_pretty(map).map_err(|e| self.config_error(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        log::info!("Saved {} grab keys to {}", map.len(), self.path.display());
        Ok(())
    }

    fn config_error(&self, reason: String) -> Error {
        Error::Config {
            path: self.path.clone(),
            reason,
        }
    }
}

impl Default for KeyMapStore {
    fn default() -> Self {
        Self::new()
    }
}
