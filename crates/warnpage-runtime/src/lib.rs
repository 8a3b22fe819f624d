#![forbid(unsafe_code)]

//! Interaction runtime for the warning interstitial.
//!
//! - [`bypass`]: secret keystroke sequence that forces the page to proceed.
//! - [`dispatch`]: routes [`Command`]s to the host boundary.
//! - [`layout`]: compact/standard layout switching with panel preservation.
//! - [`debugging`]: certificate debugging panel for certificate errors.
//! - [`page`]: [`InterstitialPage`], which wires the pieces together.
//!
//! All state machines are single-threaded and host-driven: nothing here
//! blocks, spawns, or performs I/O.
//!
//! [`Command`]: warnpage_core::Command

pub mod bypass;
pub mod debugging;
pub mod dispatch;
pub mod layout;
pub mod page;

pub use bypass::{BypassAction, BypassConfig, BypassConfigError, BypassDetector};
pub use debugging::{DebuggingField, DebuggingInfo};
pub use dispatch::{CommandDispatcher, HostBinding, HostChannel, HostController};
pub use layout::{CompactLayoutQuery, LayoutController, LayoutMode, PanelVisibility, Viewport};
pub use page::{DetailsToggle, InterstitialPage, PageConfig, PageError};
