#![forbid(unsafe_code)]

//! `warnpage-web` drives an [`InterstitialPage`] from a web host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes [`HostEvent`]s (as
//!   values or JSON) and calls [`WebInterstitial::step`].
//! - **Output as data**: every DOM change is recorded as a [`DomMutation`]
//!   and every host command as its numeric id, so the host applies them in
//!   order and tests can assert on them.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The [`blocklist`] module holds the navigation glue that sends blocked
//! URLs to the interstitial.

pub mod blocklist;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use warnpage_core::{Affordance, LoadTimeData, keys};
use warnpage_runtime::{
    HostBinding, HostChannel, InterstitialPage, PageConfig, PageError, PanelVisibility, Viewport,
};

pub use blocklist::{BlockList, Rule};

/// DOM id of the main explanation block.
pub const MAIN_CONTENT_ID: &str = "main-content";
/// DOM id of the details panel.
pub const DETAILS_ID: &str = "details";
/// DOM id of the certificate debugging panel.
pub const DEBUGGING_ID: &str = "error-debugging-info";
/// DOM id of the extended-reporting checkbox.
pub const OPT_IN_CHECKBOX_ID: &str = "opt-in-checkbox";
pub const FINAL_PARAGRAPH_ID: &str = "final-paragraph";
pub const RECURRENT_ERROR_ID: &str = "recurrent-error-message";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Web adapter error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// The page could not be built from the host's configuration.
    Page(PageError),
    /// A host event could not be decoded.
    Event(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(e) => write!(f, "{e}"),
            Self::Event(msg) => write!(f, "invalid host event: {msg}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Page(e) => Some(e),
            Self::Event(_) => None,
        }
    }
}

impl From<PageError> for WebError {
    fn from(e: PageError) -> Self {
        Self::Page(e)
    }
}

// ---------------------------------------------------------------------------
// Host events
// ---------------------------------------------------------------------------

/// An event forwarded by the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    /// Click on the element with this DOM id.
    Click { element: String },
    /// A `keypress` with its key code.
    KeyPress { code: u32 },
    /// The viewport was resized.
    Resize { width: u32, height: u32 },
    /// The extended-reporting checkbox changed.
    ReportingCheckbox { checked: bool },
}

impl HostEvent {
    /// Click on `affordance`.
    #[must_use]
    pub fn click(affordance: Affordance) -> Self {
        Self::Click {
            element: affordance.element_id().to_string(),
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// One change the host must apply to the DOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomMutation {
    SetBodyClass { class: &'static str },
    SetThemeColor { color: &'static str },
    SetHidden { element: &'static str, hidden: bool },
    /// Set the element's text to the localized string under `key`.
    SetLabel { element: &'static str, key: &'static str },
    SetChecked { element: &'static str, checked: bool },
}

/// Captured outputs for host consumption.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct WebOutputs {
    /// DOM mutations in application order.
    pub mutations: Vec<DomMutation>,
    /// Command ids sent to the host channel, in order.
    pub commands: Vec<i32>,
}

impl WebOutputs {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.commands.is_empty()
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Generic host channel that buffers command ids until the next drain.
#[derive(Debug, Clone, Default)]
struct CommandLog(Rc<RefCell<Vec<i32>>>);

impl CommandLog {
    fn drain(&self) -> Vec<i32> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl HostChannel for CommandLog {
    fn send(&self, command_id: i32) {
        self.0.borrow_mut().push(command_id);
    }
}

// ---------------------------------------------------------------------------
// WebInterstitial
// ---------------------------------------------------------------------------

/// Host-driven wrapper around an [`InterstitialPage`].
#[derive(Debug)]
pub struct WebInterstitial {
    page: InterstitialPage,
    queue: VecDeque<HostEvent>,
    commands: CommandLog,
    outputs: WebOutputs,
}

impl WebInterstitial {
    /// Build the page and record its initial DOM state.
    pub fn new(data: &LoadTimeData, config: &PageConfig) -> Result<Self, WebError> {
        let commands = CommandLog::default();
        let page = InterstitialPage::new(
            data,
            HostBinding::Channel(Box::new(commands.clone())),
            config,
        )?;
        let mut web = Self {
            page,
            queue: VecDeque::new(),
            commands,
            outputs: WebOutputs::default(),
        };
        web.render_initial();
        Ok(web)
    }

    fn render_initial(&mut self) {
        let variant = self.page.variant();
        let mut out = vec![DomMutation::SetBodyClass {
            class: variant.body_class().as_str(),
        }];
        if let Some(color) = variant.theme_color() {
            out.push(DomMutation::SetThemeColor { color });
        }
        for affordance in Affordance::ALL {
            out.push(DomMutation::SetHidden {
                element: affordance.element_id(),
                hidden: !variant.is_visible(affordance),
            });
        }
        out.push(DomMutation::SetHidden {
            element: FINAL_PARAGRAPH_ID,
            hidden: !variant.shows_final_paragraph(),
        });
        out.push(DomMutation::SetHidden {
            element: RECURRENT_ERROR_ID,
            hidden: !variant.shows_recurrent_error_paragraph(),
        });
        if variant.shows_proceed_button() {
            out.push(DomMutation::SetLabel {
                element: Affordance::ProceedButton.element_id(),
                key: keys::PROCEED_BUTTON_TEXT,
            });
        }
        if variant.shows_details_button() {
            out.push(DomMutation::SetLabel {
                element: Affordance::DetailsButton.element_id(),
                key: keys::OPEN_DETAILS,
            });
        }
        match variant.reporting_checkbox() {
            Some(checked) => {
                out.push(DomMutation::SetHidden {
                    element: OPT_IN_CHECKBOX_ID,
                    hidden: false,
                });
                out.push(DomMutation::SetChecked {
                    element: OPT_IN_CHECKBOX_ID,
                    checked,
                });
            }
            None => out.push(DomMutation::SetHidden {
                element: OPT_IN_CHECKBOX_ID,
                hidden: true,
            }),
        }
        out.push(DomMutation::SetHidden {
            element: DEBUGGING_ID,
            hidden: true,
        });
        self.outputs.mutations.extend(out);
        self.push_panels(self.page.panels());
    }

    /// The wrapped page.
    #[must_use]
    pub fn page(&self) -> &InterstitialPage {
        &self.page
    }

    /// Queue an event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: HostEvent) {
        self.queue.push_back(event);
    }

    /// Decode a JSON event and queue it.
    pub fn push_json(&mut self, json: &str) -> Result<(), WebError> {
        let event = HostEvent::from_json_str(json).map_err(|e| {
            tracing::warn!(error = %e, "rejected host event");
            WebError::Event(e.to_string())
        })?;
        self.push_event(event);
        Ok(())
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply every queued event. Returns how many were processed.
    pub fn step(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.queue.pop_front() {
            self.apply(event);
            processed += 1;
        }
        self.outputs.commands.extend(self.commands.drain());
        processed
    }

    fn apply(&mut self, event: HostEvent) {
        match event {
            HostEvent::Click { element } => match Affordance::from_element_id(&element) {
                Some(Affordance::DetailsButton) => self.toggle_details(),
                Some(Affordance::ErrorCode) => self.toggle_debugging(),
                Some(affordance) => {
                    self.page.click(affordance);
                }
                None => tracing::debug!(element = %element, "click on unknown element ignored"),
            },
            HostEvent::KeyPress { code } => {
                self.page.key_press(code);
            }
            HostEvent::Resize { width, height } => {
                if let Some(panels) = self.page.viewport_changed(Viewport::new(width, height)) {
                    self.push_panels(panels);
                }
            }
            HostEvent::ReportingCheckbox { checked } => {
                if self.page.set_reporting_opt_in(checked).is_some() {
                    self.outputs.mutations.push(DomMutation::SetChecked {
                        element: OPT_IN_CHECKBOX_ID,
                        checked,
                    });
                }
            }
        }
    }

    fn toggle_details(&mut self) {
        let Some(toggle) = self.page.toggle_details() else {
            return;
        };
        self.outputs.mutations.push(DomMutation::SetLabel {
            element: Affordance::DetailsButton.element_id(),
            key: toggle.label_key,
        });
        self.push_panels(toggle.panels);
    }

    fn toggle_debugging(&mut self) {
        if !self.page.variant().is_visible(Affordance::ErrorCode) {
            return;
        }
        if let Some(expanded) = self.page.click_error_code() {
            self.outputs.mutations.push(DomMutation::SetHidden {
                element: DEBUGGING_ID,
                hidden: !expanded,
            });
        }
    }

    fn push_panels(&mut self, panels: PanelVisibility) {
        self.outputs.mutations.push(DomMutation::SetHidden {
            element: MAIN_CONTENT_ID,
            hidden: !panels.main_content,
        });
        self.outputs.mutations.push(DomMutation::SetHidden {
            element: DETAILS_ID,
            hidden: !panels.details,
        });
    }

    /// Captured outputs since the last [`take_outputs`](Self::take_outputs).
    #[must_use]
    pub const fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Hand the captured outputs to the host and start a fresh batch.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
