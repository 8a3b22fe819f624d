#![forbid(unsafe_code)]

//! Commands the page reports to its host.
//!
//! Commands are plain values without payload. Each has a stable numeric id
//! used on the generic host channel when no controller object is bound.

use std::fmt;

/// A user decision or request forwarded to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    NotProceed,
    Proceed,
    ShowMoreSection,
    OpenHelpCenter,
    OpenDiagnostic,
    Reload,
    OpenDateSettings,
    OpenLogin,
    /// Opt in to extended reporting.
    DoReport,
    /// Opt out of extended reporting.
    DontReport,
    OpenReportingPrivacy,
    OpenWhitepaper,
    ReportPhishingError,
    OpenEnhancedProtectionSettings,
}

impl Command {
    /// All commands, ordered by id.
    pub const ALL: [Command; 14] = [
        Self::NotProceed,
        Self::Proceed,
        Self::ShowMoreSection,
        Self::OpenHelpCenter,
        Self::OpenDiagnostic,
        Self::Reload,
        Self::OpenDateSettings,
        Self::OpenLogin,
        Self::DoReport,
        Self::DontReport,
        Self::OpenReportingPrivacy,
        Self::OpenWhitepaper,
        Self::ReportPhishingError,
        Self::OpenEnhancedProtectionSettings,
    ];

    /// Numeric id sent over the generic host channel.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::NotProceed => 0,
            Self::Proceed => 1,
            Self::ShowMoreSection => 2,
            Self::OpenHelpCenter => 3,
            Self::OpenDiagnostic => 4,
            Self::Reload => 5,
            Self::OpenDateSettings => 6,
            Self::OpenLogin => 7,
            Self::DoReport => 8,
            Self::DontReport => 9,
            Self::OpenReportingPrivacy => 10,
            Self::OpenWhitepaper => 11,
            Self::ReportPhishingError => 12,
            Self::OpenEnhancedProtectionSettings => 13,
        }
    }

    /// Inverse of [`id`](Self::id).
    #[must_use]
    pub fn from_id(id: i32) -> Option<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Name of the matching host controller method.
    #[must_use]
    pub const fn host_method(self) -> &'static str {
        match self {
            Self::NotProceed => "notProceed",
            Self::Proceed => "proceed",
            Self::ShowMoreSection => "showMoreSection",
            Self::OpenHelpCenter => "openHelpCenter",
            Self::OpenDiagnostic => "openDiagnostic",
            Self::Reload => "reload",
            Self::OpenDateSettings => "openDateSettings",
            Self::OpenLogin => "openLogin",
            Self::DoReport => "doReport",
            Self::DontReport => "dontReport",
            Self::OpenReportingPrivacy => "openReportingPrivacy",
            Self::OpenWhitepaper => "openWhitepaper",
            Self::ReportPhishingError => "reportPhishingError",
            Self::OpenEnhancedProtectionSettings => "openEnhancedProtectionSettings",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host_method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_declaration_order() {
        for (i, cmd) in Command::ALL.into_iter().enumerate() {
            assert_eq!(cmd.id(), i as i32);
        }
    }

    #[test]
    fn from_id_inverts_id() {
        for cmd in Command::ALL {
            assert_eq!(Command::from_id(cmd.id()), Some(cmd));
        }
        assert_eq!(Command::from_id(-1), None);
        assert_eq!(Command::from_id(14), None);
    }

    #[test]
    fn host_methods_are_distinct() {
        let mut names: Vec<_> = Command::ALL.iter().map(|c| c.host_method()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Command::ALL.len());
    }
}
