pub mod exporter;
pub mod extractor;
pub mod playback;
pub mod probe;

pub use exporter::*;
pub use extractor::*;
pub use playback::*;
