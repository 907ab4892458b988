use crate::core::error::{Error, Result};
use crate::core::keymap::{KeyMap, NEW_KEY_SECONDS};

/// Staged editing of the key map.
///
/// The editor works on its own clone of the live map; nothing the user does
/// here is visible to key dispatch until the app commits the staged copy
/// back. Dropping the editor is a cancel.
pub struct SettingsEditor {
    staged: KeyMap,
}

impl SettingsEditor {
    pub fn open(current: &KeyMap) -> Self {
        SettingsEditor {
            staged: current.clone(),
        }
    }

    pub fn staged(&self) -> &KeyMap {
        &self.staged
    }

    pub fn increase(&mut self, key: char) {
        if let Some(seconds) = self.staged.get_mut(key) {
            *seconds = seconds.saturating_add(1);
        }
    }

    /// Durations never drop below 1 second; a zero-length grab is useless.
    pub fn decrease(&mut self, key: char) {
        if let Some(seconds) = self.staged.get_mut(key) {
            if *seconds > 1 {
                *seconds -= 1;
            }
        }
    }

    pub fn delete(&mut self, key: char) {
        self.staged.remove(key);
    }

    /// Binds the first unused letter to the default duration. Returns the
    /// chosen letter, or `None` when all 26 letters are taken.
    pub fn add_next(&mut self) -> Option<char> {
        let letter = self.staged.next_free_letter()?;
        self.staged.insert(letter, NEW_KEY_SECONDS);
        Some(letter)
    }

    /// Moves the duration bound to `old` under `new`. The staged map is left
    /// untouched when `new` is already bound.
    pub fn rename(&mut self, old: char, new: char) -> Result<()> {
        if self.staged.contains(new) {
            return Err(Error::KeyConflict(new));
        }
        if let Some(seconds) = self.staged.remove(old) {
            self.staged.insert(new, seconds);
        }
        Ok(())
    }

    /// Commit: hand the staged map to the caller, consuming the editor.
    pub fn into_staged(self) -> KeyMap {
        self.staged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keymap::ALPHABET;

    #[test]
    fn test_open_clones_without_touching_original() {
        let live = KeyMap::default();
        let mut editor = SettingsEditor::open(&live);
        editor.increase('s');
        editor.delete('m');
        editor.add_next();

        // All edits stayed on the staged copy.
        assert_eq!(live, KeyMap::default());
        assert_eq!(editor.staged().duration_for('s'), Some(9));
    }

    #[test]
    fn test_cancel_leaves_live_map_unchanged() {
        let live = KeyMap::default();

        // Opening and dropping an editor twice, with or without edits,
        // never writes back.
        let editor = SettingsEditor::open(&live);
        drop(editor);
        let mut editor = SettingsEditor::open(&live);
        editor.delete('s');
        drop(editor);

        assert_eq!(live, KeyMap::default());
    }

    #[test]
    fn test_increase_and_decrease_adjust_by_one() {
        let mut editor = SettingsEditor::open(&KeyMap::default());
        editor.increase('m');
        assert_eq!(editor.staged().duration_for('m'), Some(17));
        editor.decrease('m');
        editor.decrease('m');
        assert_eq!(editor.staged().duration_for('m'), Some(15));
    }

    #[test]
    fn test_decrease_clamps_at_one_second() {
        let mut editor = SettingsEditor::open(&[('a', 2)].into_iter().collect());
        editor.decrease('a');
        editor.decrease('a');
        editor.decrease('a');
        assert_eq!(editor.staged().duration_for('a'), Some(1));
    }

    #[test]
    fn test_adjusting_unknown_key_is_a_no_op() {
        let mut editor = SettingsEditor::open(&KeyMap::default());
        editor.increase('x');
        editor.decrease('x');
        assert_eq!(editor.staged(), &KeyMap::default());
    }

    #[test]
    fn test_add_next_picks_first_unused_letter() {
        let mut editor = SettingsEditor::open(&[('a', 5), ('b', 6)].into_iter().collect());
        assert_eq!(editor.add_next(), Some('c'));
        assert_eq!(editor.staged().duration_for('c'), Some(NEW_KEY_SECONDS));
    }

    #[test]
    fn test_add_next_on_full_map_is_a_no_op() {
        let full: KeyMap = ALPHABET.map(|c| (c, 1)).collect();
        let mut editor = SettingsEditor::open(&full);
        assert_eq!(editor.add_next(), None);
        assert_eq!(editor.staged(), &full);
    }

    #[test]
    fn test_rename_moves_duration_under_new_key() {
        let mut editor = SettingsEditor::open(&KeyMap::default());
        editor.rename('s', 'x').expect("rename failed");
        assert_eq!(editor.staged().duration_for('x'), Some(8));
        assert!(!editor.staged().contains('s'));
    }

    #[test]
    fn test_rename_to_existing_key_conflicts_and_changes_nothing() {
        let mut editor = SettingsEditor::open(&KeyMap::default());
        let result = editor.rename('s', 'm');
        assert!(matches!(result, Err(Error::KeyConflict('m'))));
        assert_eq!(editor.staged(), &KeyMap::default());
    }

    #[test]
    fn test_commit_hands_back_the_staged_map() {
        let mut editor = SettingsEditor::open(&KeyMap::default());
        editor.delete('l');
        editor.increase('s');
        let committed = editor.into_staged();
        assert!(!committed.contains('l'));
        assert_eq!(committed.duration_for('s'), Some(9));
    }
}
