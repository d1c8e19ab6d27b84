pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod macros;
pub mod outcome;
pub mod picker;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod select;

pub use config::{AssetRefs, Speed, SpinMode, WheelConfig};
pub use controller::{SpinController, SpinState};
pub use engine::WheelEngine;
pub use outcome::{AssetUrl, HexColor, Outcome, OutcomeId};
pub use scheduler::{ManualScheduler, RunId, SpinScheduler, Wake, WakeKind};
