#![forbid(unsafe_code)]

//! Warning interstitial controller: public facade.
//!
//! Re-exports the types a host needs to configure, build and drive the
//! page, plus a top-level [`Error`] and a [`prelude`].
//!
//! ```
//! use warnpage::prelude::*;
//!
//! # fn main() -> warnpage::Result<()> {
//! let mut data = LoadTimeData::new();
//! data.set_data_json(r#"{"type": "CAPTIVE_PORTAL", "overridable": false,
//!     "hide_primary_button": false, "show_recurrent_error_paragraph": false}"#)?;
//! let variant = Variant::select(&data)?;
//! assert_eq!(variant.primary_command(), Some(Command::OpenLogin));
//! # Ok(())
//! # }
//! ```

use std::fmt;

// --- Text re-exports -------------------------------------------------------

pub use warnpage_text::{Piece, TemplateError, format, format_pieces};

// --- Core re-exports -------------------------------------------------------

pub use warnpage_core::{
    Affordance, BodyClass, Command, ConfigError, Dictionary, InterstitialKind, LoadTimeData,
    Value, Variant,
};

// --- Runtime re-exports ----------------------------------------------------

pub use warnpage_runtime::{
    BypassConfig, BypassConfigError, BypassDetector, CommandDispatcher, CompactLayoutQuery,
    DetailsToggle, HostBinding, HostChannel, HostController, InterstitialPage, LayoutController,
    LayoutMode, PageConfig, PageError, PanelVisibility, Viewport,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use warnpage_web::{BlockList, DomMutation, HostEvent, WebError, WebInterstitial, WebOutputs};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad or missing configuration value.
    Config(ConfigError),
    /// Malformed localized template.
    Template(TemplateError),
    /// Unusable bypass phrase.
    Bypass(BypassConfigError),
    /// Host event could not be decoded.
    Event(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Template(err) => write!(f, "{err}"),
            Self::Bypass(err) => write!(f, "{err}"),
            Self::Event(msg) => write!(f, "invalid host event: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Template(err) => Some(err),
            Self::Bypass(err) => Some(err),
            Self::Event(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<TemplateError> for Error {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

impl From<BypassConfigError> for Error {
    fn from(err: BypassConfigError) -> Self {
        Self::Bypass(err)
    }
}

impl From<PageError> for Error {
    fn from(err: PageError) -> Self {
        match err {
            PageError::Config(e) => Self::Config(e),
            PageError::Bypass(e) => Self::Bypass(e),
        }
    }
}

#[cfg(feature = "web")]
impl From<WebError> for Error {
    fn from(err: WebError) -> Self {
        match err {
            WebError::Page(e) => e.into(),
            WebError::Event(msg) => Self::Event(msg),
        }
    }
}

/// Standard result type for warnpage APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Affordance, Command, Error, HostBinding, HostChannel, HostController, InterstitialKind,
        InterstitialPage, LoadTimeData, PageConfig, Result, Value, Variant, Viewport,
    };

    pub use crate::{core, runtime, text};
}

pub use warnpage_core as core;
pub use warnpage_runtime as runtime;
pub use warnpage_text as text;
#[cfg(feature = "web")]
pub use warnpage_web as web;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_errors_flatten() {
        let err: Error = PageError::Bypass(BypassConfigError::Empty).into();
        assert_eq!(err, Error::Bypass(BypassConfigError::Empty));
        assert_eq!(err.to_string(), "bypass sequence is empty");
    }

    #[test]
    fn template_errors_convert() {
        let err: Error = format("$", &["x"]).unwrap_err().into();
        assert!(matches!(err, Error::Template(TemplateError::UnescapedDollar { .. })));
    }

    #[test]
    fn config_error_has_source() {
        let err: Error = ConfigError::Uninitialized.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
