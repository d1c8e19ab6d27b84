pub mod border;
pub mod color;
pub mod theme;

pub use border::{BorderEffects, BorderKind, BorderStyleDefinition};
pub use theme::{Background, Theme};
