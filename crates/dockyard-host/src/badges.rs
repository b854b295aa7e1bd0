// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unread badges derived from content-view document titles.

use std::sync::LazyLock;

use dockyard_core::types::{BadgeCounts, ServiceId};
use regex::Regex;

static PAREN_COUNT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\((\d+)\)").ok());
static BRACKET_COUNT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\[(\d+)\]").ok());

/// Unread count advertised in a page title such as `Inbox (3)` or `[12] Chat`.
///
/// The first `(N)` is tried, then the first `[N]`; zero, overflowing or
/// absent numbers yield 0.
pub fn extract_badge_count(title: &str) -> u32 {
    [&*PAREN_COUNT, &*BRACKET_COUNT]
        .into_iter()
        .flatten()
        .filter_map(|re| re.captures(title))
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .find(|n| *n > 0)
        .unwrap_or(0)
}

/// Titles that carry no information (a view being created or blanked).
pub fn is_placeholder_title(title: &str) -> bool {
    title.is_empty() || title == "about:blank"
}

/// Count before and after one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeChange {
    pub previous: u32,
    pub current: u32,
}

impl BadgeChange {
    pub fn increased(&self) -> bool {
        self.current > self.previous
    }
}

/// Host-side badge map. Zero counts are removed rather than stored.
#[derive(Debug, Clone, Default)]
pub struct BadgeBoard {
    counts: BadgeCounts,
}

impl BadgeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: &ServiceId, count: u32) -> BadgeChange {
        let previous = self.counts.get(id).copied().unwrap_or(0);
        if count > 0 {
            self.counts.insert(id.clone(), count);
        } else {
            self.counts.remove(id);
        }
        BadgeChange {
            previous,
            current: count,
        }
    }

    /// Drop the badge of a removed service. Returns whether one existed.
    pub fn remove(&mut self, id: &ServiceId) -> bool {
        self.counts.remove(id).is_some()
    }

    pub fn snapshot(&self) -> BadgeCounts {
        self.counts.clone()
    }
}

/// Notification body for a count increase, or `None` when the count did
/// not go up.
pub fn notification_body(service_name: &str, change: BadgeChange) -> Option<String> {
    if !change.increased() {
        return None;
    }
    let body = if change.previous == 0 {
        match change.current {
            1 => format!("1 notification from {service_name}"),
            n => format!("{n} notifications from {service_name}"),
        }
    } else {
        match change.current - change.previous {
            1 => format!("New notification from {service_name}"),
            n => format!("{n} new notifications from {service_name}"),
        }
    };
    Some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenthesised_count() {
        assert_eq!(extract_badge_count("Inbox (3) - Mail"), 3);
        assert_eq!(extract_badge_count("(12) Chat"), 12);
    }

    #[test]
    fn bracketed_count() {
        assert_eq!(extract_badge_count("[5] Team"), 5);
    }

    #[test]
    fn zero_paren_falls_through_to_bracket() {
        assert_eq!(extract_badge_count("(0) Inbox [4]"), 4);
    }

    #[test]
    fn no_count() {
        assert_eq!(extract_badge_count("Inbox"), 0);
        assert_eq!(extract_badge_count("(a) [b]"), 0);
        assert_eq!(extract_badge_count("(99999999999)"), 0);
    }

    #[test]
    fn placeholders() {
        assert!(is_placeholder_title(""));
        assert!(is_placeholder_title("about:blank"));
        assert!(!is_placeholder_title("Gmail"));
    }

    #[test]
    fn board_stores_positive_and_removes_zero() {
        let mut board = BadgeBoard::new();
        let mail = ServiceId::new("mail");
        assert_eq!(board.observe(&mail, 3), BadgeChange { previous: 0, current: 3 });
        assert_eq!(board.snapshot().get(&mail), Some(&3));
        assert_eq!(board.observe(&mail, 0), BadgeChange { previous: 3, current: 0 });
        assert!(board.snapshot().is_empty());
    }

    #[test]
    fn bodies_for_first_and_follow_up_counts() {
        let body = |previous, current| notification_body("Mail", BadgeChange { previous, current });
        assert_eq!(body(0, 1).as_deref(), Some("1 notification from Mail"));
        assert_eq!(body(0, 4).as_deref(), Some("4 notifications from Mail"));
        assert_eq!(body(2, 3).as_deref(), Some("New notification from Mail"));
        assert_eq!(body(2, 7).as_deref(), Some("5 new notifications from Mail"));
        assert_eq!(body(3, 3), None);
        assert_eq!(body(3, 1), None);
    }
}
