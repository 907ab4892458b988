/// What a recognized key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Space: flip between play and pause.
    TogglePlayback,
    /// A mapped letter: grab a clip of this many seconds ending now.
    Grab(u32),
}
