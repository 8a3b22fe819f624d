#![forbid(unsafe_code)]

//! Core: load-time configuration, interstitial kinds, commands, and the
//! variant selector that decides what the warning page shows.

pub mod affordance;
pub mod command;
pub mod keys;
pub mod kind;
pub mod load_time_data;
pub mod logging;
pub mod variant;

pub use affordance::Affordance;
pub use command::Command;
pub use kind::InterstitialKind;
pub use load_time_data::{ConfigError, Dictionary, LoadTimeData, Value};
pub use variant::{BodyClass, Variant};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, warn};
