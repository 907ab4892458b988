use egui::Key;

use crate::core::KeyMap;
use crate::hotkeys::KeyCommand;

/// Resolves a pressed key against the live key map.
///
/// Space always toggles playback. A letter bound in the map becomes a grab
/// with its configured duration. Anything else is not ours; the caller must
/// not swallow it.
pub fn resolve(key: Key, keymap: &KeyMap) -> Option<KeyCommand> {
    if key == Key::Space {
        return Some(KeyCommand::TogglePlayback);
    }
    let letter = key_to_letter(key)?;
    keymap.duration_for(letter).map(KeyCommand::Grab)
}

/// The lowercase letter a key produces, if it is a letter key at all.
pub fn key_to_letter(key: Key) -> Option<char> {
    let letter = match key {
        Key::A => 'a',
        Key::B => 'b',
        Key::C => 'c',
        Key::D => 'd',
        Key::E => 'e',
        Key::F => 'f',
        Key::G => 'g',
        Key::H => 'h',
        Key::I => 'i',
        Key::J => 'j',
        Key::K => 'k',
        Key::L => 'l',
        Key::M => 'm',
        Key::N => 'n',
        Key::O => 'o',
        Key::P => 'p',
        Key::Q => 'q',
        Key::R => 'r',
        Key::S => 's',
        Key::T => 't',
        Key::U => 'u',
        Key::V => 'v',
        Key::W => 'w',
        Key::X => 'x',
        Key::Y => 'y',
        Key::Z => 'z',
        _ => return None,
    };
    Some(letter)
}
