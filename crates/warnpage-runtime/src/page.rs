#![forbid(unsafe_code)]

//! The interstitial page controller.
//!
//! [`InterstitialPage`] is built once from the configuration store. It
//! selects the [`Variant`], binds the host, and owns the two independent
//! state machines (bypass detector and layout controller). The render layer
//! forwards raw UI events to it and reads back what to show.
//!
//! # Event flow
//!
//! ```text
//!   click ───────────► click(affordance) ──► Variant::command_for ──┐
//!                      (proceed link only while details are open)   │
//!   details button ──► toggle_details() ──► LayoutController        ├─► CommandDispatcher ─► host
//!   checkbox ────────► set_reporting_opt_in()  ─────────────────────┤
//!   keypress ────────► key_press() ─────────► BypassDetector ───────┘
//!   resize ──────────► viewport_changed() ──► LayoutController
//! ```

use std::fmt;

use warnpage_core::{Affordance, Command, ConfigError, LoadTimeData, Variant, keys};

use crate::bypass::{BypassConfig, BypassConfigError, BypassDetector};
use crate::debugging::DebuggingInfo;
use crate::dispatch::{CommandDispatcher, HostBinding};
use crate::layout::{CompactLayoutQuery, LayoutController, PanelVisibility, Viewport};

// ---------------------------------------------------------------------------
// Configuration and errors
// ---------------------------------------------------------------------------

/// Runtime configuration of the page (not the host's load-time data).
#[derive(Debug, Clone, Default)]
pub struct PageConfig {
    pub bypass: BypassConfig,
    pub layout: CompactLayoutQuery,
}

impl PageConfig {
    #[must_use]
    pub fn with_bypass(mut self, bypass: BypassConfig) -> Self {
        self.bypass = bypass;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: CompactLayoutQuery) -> Self {
        self.layout = layout;
        self
    }
}

/// Errors that abort page construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    Config(ConfigError),
    Bypass(BypassConfigError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Bypass(e) => write!(f, "bypass configuration error: {e}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Bypass(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PageError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<BypassConfigError> for PageError {
    fn from(e: BypassConfigError) -> Self {
        Self::Bypass(e)
    }
}

// ---------------------------------------------------------------------------
// Details toggle
// ---------------------------------------------------------------------------

/// Outcome of a details-button click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsToggle {
    /// Whether the details panel is now open.
    pub open: bool,
    /// Panel visibility after the toggle.
    pub panels: PanelVisibility,
    /// Localized label key for the button's new text.
    pub label_key: &'static str,
    /// `ShowMoreSection` on the first expansion only.
    pub command: Option<Command>,
}

// ---------------------------------------------------------------------------
// InterstitialPage
// ---------------------------------------------------------------------------

/// Interaction controller for one page instance.
#[derive(Debug)]
pub struct InterstitialPage {
    variant: Variant,
    dispatcher: CommandDispatcher,
    bypass: BypassDetector,
    layout: LayoutController,
    query: CompactLayoutQuery,
    debugging: Option<DebuggingInfo>,
    details_expanded_once: bool,
    reporting_opt_in: Option<bool>,
}

impl InterstitialPage {
    /// Build the page. Any configuration problem aborts construction.
    pub fn new(
        data: &LoadTimeData,
        binding: HostBinding,
        config: &PageConfig,
    ) -> Result<Self, PageError> {
        Self::build(data, binding, config).inspect_err(|e| {
            tracing::error!(error = %e, "interstitial page construction failed");
        })
    }

    fn build(
        data: &LoadTimeData,
        binding: HostBinding,
        config: &PageConfig,
    ) -> Result<Self, PageError> {
        let variant = Variant::select(data)?;
        let debugging = if variant.has_debugging_info() {
            Some(DebuggingInfo::from_config(data)?)
        } else {
            None
        };
        if variant.shows_details_button() {
            // Both labels must exist before the first click needs them.
            data.get_string(keys::OPEN_DETAILS)?;
            data.get_string(keys::CLOSE_DETAILS)?;
        }
        let bypass = BypassDetector::new(&config.bypass)?;

        tracing::info!(
            kind = %variant.kind(),
            body_class = variant.body_class().as_str(),
            overridable = variant.is_overridable(),
            binding = binding.name(),
            "interstitial page constructed"
        );
        Ok(Self {
            reporting_opt_in: variant.reporting_checkbox(),
            variant,
            dispatcher: CommandDispatcher::new(binding),
            bypass,
            layout: LayoutController::new(),
            query: config.layout,
            debugging,
            details_expanded_once: false,
        })
    }

    #[must_use]
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutController {
        &self.layout
    }

    #[must_use]
    pub fn panels(&self) -> PanelVisibility {
        self.layout.panels()
    }

    #[must_use]
    pub fn bypass(&self) -> &BypassDetector {
        &self.bypass
    }

    /// The certificate debugging panel, present for certificate errors only.
    #[must_use]
    pub fn debugging(&self) -> Option<&DebuggingInfo> {
        self.debugging.as_ref()
    }

    /// Current state of the extended-reporting checkbox, `None` when hidden.
    #[must_use]
    pub const fn reporting_opt_in(&self) -> Option<bool> {
        self.reporting_opt_in
    }

    /// Handle a click. Returns the command sent to the host, if any.
    ///
    /// Clicks on affordances this variant does not render are ignored, as
    /// are clicks on the proceed link while the details panel is closed.
    pub fn click(&mut self, affordance: Affordance) -> Option<Command> {
        if !self.variant.is_visible(affordance) {
            tracing::debug!(element = affordance.element_id(), "click on hidden element ignored");
            return None;
        }
        match affordance {
            Affordance::DetailsButton => self.toggle_details().and_then(|t| t.command),
            Affordance::ProceedLink if !self.layout.panels().details => {
                tracing::debug!("proceed link clicked with details closed; ignored");
                None
            }
            Affordance::ErrorCode => {
                self.click_error_code();
                None
            }
            other => {
                let command = self.variant.command_for(other)?;
                self.dispatcher.dispatch(command);
                Some(command)
            }
        }
    }

    /// Open or close the details panel.
    ///
    /// Returns `None` and changes nothing when this variant has no details
    /// button.
    pub fn toggle_details(&mut self) -> Option<DetailsToggle> {
        if !self.variant.shows_details_button() {
            tracing::debug!(kind = %self.variant.kind(), "variant has no details panel");
            return None;
        }
        let open = self.layout.toggle_details();
        let command = if open && !self.details_expanded_once {
            self.details_expanded_once = true;
            self.dispatcher.dispatch(Command::ShowMoreSection);
            Some(Command::ShowMoreSection)
        } else {
            None
        };
        Some(DetailsToggle {
            open,
            panels: self.layout.panels(),
            label_key: if open {
                keys::CLOSE_DETAILS
            } else {
                keys::OPEN_DETAILS
            },
            command,
        })
    }

    /// Record a change of the extended-reporting checkbox.
    pub fn set_reporting_opt_in(&mut self, checked: bool) -> Option<Command> {
        if self.reporting_opt_in.is_none() {
            tracing::debug!("reporting checkbox is not shown; change ignored");
            return None;
        }
        self.reporting_opt_in = Some(checked);
        let command = if checked {
            Command::DoReport
        } else {
            Command::DontReport
        };
        self.dispatcher.dispatch(command);
        Some(command)
    }

    /// Feed a keystroke; dispatches `Proceed` when the bypass phrase completes.
    pub fn key_press(&mut self, code: u32) -> bool {
        let fired = self.bypass.on_key(code);
        if fired {
            self.dispatcher.dispatch(Command::Proceed);
        }
        fired
    }

    /// Re-evaluate the layout for a new viewport size.
    pub fn viewport_changed(&mut self, viewport: Viewport) -> Option<PanelVisibility> {
        self.layout.observe_viewport(&self.query, viewport)
    }

    /// Toggle the certificate debugging panel.
    ///
    /// Returns the new expansion state, or `None` when this page has no
    /// debugging panel.
    pub fn click_error_code(&mut self) -> Option<bool> {
        self.debugging.as_mut().map(DebuggingInfo::toggle)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
