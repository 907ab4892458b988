pub mod error;
pub mod keymap;
pub mod settings_editor;


pub use error::*;
pub use keymap::*;
pub use settings_editor::*;
