#![forbid(unsafe_code)]

//! Command dispatch to the host boundary.
//!
//! The page reports decisions through one of two host bindings, chosen once
//! when the page is built:
//!
//! - [`HostController`]: a capability object with one method per command.
//! - [`HostChannel`]: a generic one-way channel carrying the numeric
//!   command id, used when no controller object is available.
//!
//! [`CommandDispatcher`] is a routing shim: every call produces exactly one
//! host notification, with no buffering and no deduplication.

use std::fmt;

use warnpage_core::Command;

// ---------------------------------------------------------------------------
// Host boundary
// ---------------------------------------------------------------------------

/// Host object exposing one method per [`Command`].
///
/// Adding a command variant without a method here fails to compile in
/// [`CommandDispatcher::dispatch`], whose match is exhaustive.
pub trait HostController {
    fn not_proceed(&self);
    fn proceed(&self);
    fn show_more_section(&self);
    fn open_help_center(&self);
    fn open_diagnostic(&self);
    fn reload(&self);
    fn open_date_settings(&self);
    fn open_login(&self);
    fn do_report(&self);
    fn dont_report(&self);
    fn open_reporting_privacy(&self);
    fn open_whitepaper(&self);
    fn report_phishing_error(&self);
    fn open_enhanced_protection_settings(&self);
}

/// Generic one-way channel to the host.
pub trait HostChannel {
    /// Send a command id (see [`Command::id`]).
    fn send(&self, command_id: i32);
}

/// The host binding resolved at page construction.
pub enum HostBinding {
    Controller(Box<dyn HostController>),
    Channel(Box<dyn HostChannel>),
}

impl HostBinding {
    /// Prefer the controller object; fall back to the generic channel.
    #[must_use]
    pub fn resolve(
        controller: Option<Box<dyn HostController>>,
        channel: Box<dyn HostChannel>,
    ) -> Self {
        match controller {
            Some(controller) => Self::Controller(controller),
            None => {
                tracing::debug!("no host controller; using generic host channel");
                Self::Channel(channel)
            }
        }
    }

    /// Short name of the binding for logs and diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Controller(_) => "controller",
            Self::Channel(_) => "channel",
        }
    }
}

impl fmt::Debug for HostBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HostBinding").field(&self.name()).finish()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes commands to the bound host. Holds no state besides the binding.
#[derive(Debug)]
pub struct CommandDispatcher {
    binding: HostBinding,
}

impl CommandDispatcher {
    #[must_use]
    pub fn new(binding: HostBinding) -> Self {
        Self { binding }
    }

    #[must_use]
    pub fn binding(&self) -> &HostBinding {
        &self.binding
    }

    /// Forward `command` to the host. Exactly one host call per invocation.
    pub fn dispatch(&self, command: Command) {
        tracing::debug!(
            command = command.host_method(),
            id = command.id(),
            binding = self.binding.name(),
            "dispatching command"
        );
        match &self.binding {
            HostBinding::Controller(host) => match command {
                Command::NotProceed => host.not_proceed(),
                Command::Proceed => host.proceed(),
                Command::ShowMoreSection => host.show_more_section(),
                Command::OpenHelpCenter => host.open_help_center(),
                Command::OpenDiagnostic => host.open_diagnostic(),
                Command::Reload => host.reload(),
                Command::OpenDateSettings => host.open_date_settings(),
                Command::OpenLogin => host.open_login(),
                Command::DoReport => host.do_report(),
                Command::DontReport => host.dont_report(),
                Command::OpenReportingPrivacy => host.open_reporting_privacy(),
                Command::OpenWhitepaper => host.open_whitepaper(),
                Command::ReportPhishingError => host.report_phishing_error(),
                Command::OpenEnhancedProtectionSettings => {
                    host.open_enhanced_protection_settings()
                }
            },
            HostBinding::Channel(channel) => channel.send(command.id()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
