//! Save-outcome banners.
//!
//! Two independent banners report the result of a submission. Each closes on
//! its own after the auto-hide duration, or when the user closes it. Clicking
//! elsewhere on the page never closes a banner.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Time a banner stays open without user action.
pub const DEFAULT_AUTO_HIDE: Duration = Duration::from_millis(6000);

/// Which banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn message(self) -> &'static str {
        match self {
            NotificationKind::Success => "Changes Saved!",
            NotificationKind::Error => "Uh oh! Something went wrong.",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// Why a close was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Auto-hide duration elapsed.
    Timeout,
    /// Close button.
    Explicit,
    /// Click outside the banner. Ignored.
    ClickAway,
}

#[derive(Debug, Clone, Copy, Default)]
struct Banner {
    hide_at: Option<Instant>,
    shown: u32,
}

/// Open/closed state of both banners.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    auto_hide: Duration,
    success: Banner,
    error: Banner,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_HIDE)
    }
}

impl NotificationCenter {
    pub fn new(auto_hide: Duration) -> Self {
        Self {
            auto_hide,
            success: Banner::default(),
            error: Banner::default(),
        }
    }

    pub fn auto_hide(&self) -> Duration {
        self.auto_hide
    }

    fn banner(&self, kind: NotificationKind) -> &Banner {
        match kind {
            NotificationKind::Success => &self.success,
            NotificationKind::Error => &self.error,
        }
    }

    fn banner_mut(&mut self, kind: NotificationKind) -> &mut Banner {
        match kind {
            NotificationKind::Success => &mut self.success,
            NotificationKind::Error => &mut self.error,
        }
    }

    /// Opens `kind`, restarting its auto-hide timer if already open.
    pub fn show(&mut self, kind: NotificationKind) {
        self.show_at(kind, Instant::now());
    }

    pub fn show_at(&mut self, kind: NotificationKind, now: Instant) {
        let hide_at = now + self.auto_hide;
        let banner = self.banner_mut(kind);
        banner.hide_at = Some(hide_at);
        banner.shown += 1;

        tracing::debug!(
            notification = %kind,
            shown = banner.shown,
            "Showing notification"
        );
    }

    /// Closes `kind` unless `reason` is a click-away. Returns whether a
    /// visible banner was closed.
    pub fn close(&mut self, kind: NotificationKind, reason: CloseReason) -> bool {
        if reason == CloseReason::ClickAway {
            return false;
        }
        self.banner_mut(kind).hide_at.take().is_some()
    }

    pub fn is_open(&self, kind: NotificationKind) -> bool {
        self.banner(kind).hide_at.is_some()
    }

    /// Number of times `kind` has been shown.
    pub fn shown_count(&self, kind: NotificationKind) -> u32 {
        self.banner(kind).shown
    }

    /// Closes banners whose auto-hide duration has elapsed.
    pub fn tick(&mut self) -> Vec<NotificationKind> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Vec<NotificationKind> {
        let mut closed = Vec::new();
        for kind in [NotificationKind::Success, NotificationKind::Error] {
            let expired = self.banner(kind).hide_at.is_some_and(|at| at <= now);
            if expired && self.close(kind, CloseReason::Timeout) {
                closed.push(kind);
            }
        }
        closed
    }

    /// Earliest pending auto-hide, for a host that sleeps until then.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.success.hide_at, self.error.hide_at]
            .into_iter()
            .flatten()
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_kind_display() {
        assert_eq!(NotificationKind::Success.to_string(), "success");
        assert_eq!(NotificationKind::Error.to_string(), "error");
        assert_eq!(NotificationKind::Success.message(), "Changes Saved!");
        assert_eq!(
            NotificationKind::Error.message(),
            "Uh oh! Something went wrong."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_banner_auto_hides_after_default_duration() {
        let mut center = NotificationCenter::default();
        center.show(NotificationKind::Success);

        tokio::time::advance(Duration::from_millis(5999)).await;
        assert!(center.tick().is_empty());
        assert!(center.is_open(NotificationKind::Success));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(center.tick(), vec![NotificationKind::Success]);
        assert!(!center.is_open(NotificationKind::Success));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_away_is_ignored() {
        let mut center = NotificationCenter::default();
        center.show(NotificationKind::Error);
        assert!(!center.close(NotificationKind::Error, CloseReason::ClickAway));
        assert!(center.is_open(NotificationKind::Error));
        assert!(center.close(NotificationKind::Error, CloseReason::Explicit));
        assert!(!center.is_open(NotificationKind::Error));
        assert!(!center.close(NotificationKind::Error, CloseReason::Explicit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_banners_are_independent() {
        let mut center = NotificationCenter::new(Duration::from_millis(1000));
        let start = Instant::now();
        center.show_at(NotificationKind::Success, start);
        center.show_at(NotificationKind::Error, start + Duration::from_millis(500));

        assert_eq!(center.next_deadline(), Some(start + Duration::from_millis(1000)));
        assert_eq!(
            center.tick_at(start + Duration::from_millis(1000)),
            vec![NotificationKind::Success]
        );
        assert!(center.is_open(NotificationKind::Error));
        assert_eq!(center.next_deadline(), Some(start + Duration::from_millis(1500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_counts_each_outcome() {
        let mut center = NotificationCenter::default();
        center.show(NotificationKind::Error);
        center.show(NotificationKind::Error);
        assert_eq!(center.shown_count(NotificationKind::Error), 2);
        assert_eq!(center.shown_count(NotificationKind::Success), 0);
        assert!(center.next_deadline().is_some());
    }
}
