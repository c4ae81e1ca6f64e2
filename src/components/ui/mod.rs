pub mod alert;
pub mod input;
pub mod kbd;
pub mod spinner;

// Re-export component symbols so callers can `use crate::components::ui::Alert` etc.
pub use alert::*;
pub use input::*;
pub use kbd::*;
pub use spinner::*;
