#![forbid(unsafe_code)]

//! Responsive layout controller.
//!
//! Small or short viewports use a compact layout in which the main content
//! and the details panel are shown one at a time. Larger viewports use the
//! standard layout, where opening the details keeps the main content
//! visible.
//!
//! # Invariants
//!
//! 1. The stored mode only changes when the compact predicate changes;
//!    repeated observations of the same value perform no panel writes.
//! 2. Switching mode never changes whether the details panel is open.
//! 3. In compact mode exactly one of main content / details is visible.
//! 4. In standard mode the main content is always visible.

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Media condition that selects the compact layout.
///
/// Matches narrow-and-tall viewports, or short-and-wide ones:
/// `(min-width: 240px) and (max-width: 420px) and (min-height: 401px),
/// (max-height: 560px) and (min-height: 240px) and (min-width: 421px)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactLayoutQuery {
    pub narrow_min_width: u32,
    pub narrow_max_width: u32,
    pub narrow_min_height: u32,
    pub short_min_width: u32,
    pub short_min_height: u32,
    pub short_max_height: u32,
}

impl CompactLayoutQuery {
    pub const DEFAULT: Self = Self {
        narrow_min_width: 240,
        narrow_max_width: 420,
        narrow_min_height: 401,
        short_min_width: 421,
        short_min_height: 240,
        short_max_height: 560,
    };

    /// Evaluate the condition for `viewport`.
    #[must_use]
    pub const fn matches(&self, viewport: Viewport) -> bool {
        let Viewport { width, height } = viewport;
        let narrow = width >= self.narrow_min_width
            && width <= self.narrow_max_width
            && height >= self.narrow_min_height;
        let short = height <= self.short_max_height
            && height >= self.short_min_height
            && width >= self.short_min_width;
        narrow || short
    }
}

impl Default for CompactLayoutQuery {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Layout arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Standard,
    Compact,
}

/// Visibility of the two exclusive-in-compact panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelVisibility {
    pub main_content: bool,
    pub details: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            main_content: true,
            details: false,
        }
    }
}

/// Tracks layout mode and panel visibility.
#[derive(Debug, Clone, Default)]
pub struct LayoutController {
    mode: LayoutMode,
    panels: PanelVisibility,
    swaps: u64,
}

impl LayoutController {
    /// Standard layout, main content visible, details closed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn mode(&self) -> LayoutMode {
        self.mode
    }

    #[must_use]
    pub const fn is_compact(&self) -> bool {
        matches!(self.mode, LayoutMode::Compact)
    }

    #[must_use]
    pub const fn panels(&self) -> PanelVisibility {
        self.panels
    }

    /// Number of layout swaps performed so far.
    #[must_use]
    pub const fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Observe the compact predicate.
    ///
    /// Returns the new panel visibility when the mode flipped, `None` when
    /// the predicate is unchanged.
    pub fn observe(&mut self, compact: bool) -> Option<PanelVisibility> {
        if compact == self.is_compact() {
            return None;
        }

        let details_open = self.panels.details;
        self.mode = if compact {
            LayoutMode::Compact
        } else {
            LayoutMode::Standard
        };
        self.panels = PanelVisibility {
            main_content: !compact || !details_open,
            details: details_open,
        };
        self.swaps += 1;
        tracing::debug!(
            mode = ?self.mode,
            details_open,
            "layout mode switched"
        );
        Some(self.panels)
    }

    /// Evaluate `query` for `viewport` and [`observe`](Self::observe) the result.
    pub fn observe_viewport(
        &mut self,
        query: &CompactLayoutQuery,
        viewport: Viewport,
    ) -> Option<PanelVisibility> {
        self.observe(query.matches(viewport))
    }

    /// Open or close the details panel; returns whether it is now open.
    pub fn toggle_details(&mut self) -> bool {
        let open = !self.panels.details;
        self.panels.details = open;
        if self.is_compact() {
            self.panels.main_content = !open;
        }
        open
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
