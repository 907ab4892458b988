pub mod dispatch;
pub mod events;


pub use dispatch::*;
pub use events::*;
