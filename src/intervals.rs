//! Turning login/logout events into connection intervals.
//!
//! Events are grouped per MAC address and walked in chronological order.
//! A login opens a session unless one is already open; a logout closes it
//! and emits an interval. A session still open at the end of the data emits
//! nothing.

use crate::classifier::{Action, StructuredEvent};
use crate::config::OrphanLogoutPolicy;
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One state change of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// When it happened.
    pub at: NaiveDateTime,
    /// `true` for a login, `false` for a logout.
    pub is_login: bool,
}

/// All transitions of one device, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTimeline {
    mac: String,
    transitions: Vec<Transition>,
}

impl DeviceTimeline {
    fn new(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            transitions: Vec::new(),
        }
    }

    /// The device's MAC address.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// The transitions in the order they will be walked.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Walks the transitions and returns the closed intervals.
    ///
    /// `last_login` survives a logout, so a second logout without a login in
    /// between reuses the previous login as its start. A logout before any
    /// login has no start at all.
    #[must_use]
    pub fn intervals(&self, orphans: OrphanLogoutPolicy) -> Vec<ConnectionInterval> {
        let mut logged_in = false;
        let mut last_login: Option<NaiveDateTime> = None;
        let mut intervals = Vec::new();

        for transition in &self.transitions {
            if transition.is_login {
                if !logged_in {
                    logged_in = true;
                    last_login = Some(transition.at);
                }
                continue;
            }

            let was_logged_in = std::mem::replace(&mut logged_in, false);
            if !was_logged_in {
                warn!(
                    mac = %self.mac,
                    at = %transition.at,
                    previous_login = ?last_login,
                    policy = ?orphans,
                    "Logout without preceding login"
                );
                if orphans == OrphanLogoutPolicy::Drop {
                    continue;
                }
            }

            intervals.push(ConnectionInterval {
                mac: self.mac.clone(),
                start: last_login,
                end: transition.at,
            });
        }

        intervals
    }
}

/// A closed session of one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInterval {
    /// Device MAC address.
    pub mac: String,
    /// Login time; `None` if the logout had no login before it.
    pub start: Option<NaiveDateTime>,
    /// Logout time.
    pub end: NaiveDateTime,
}

impl ConnectionInterval {
    /// Time between login and logout, if the login is known.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.start.map(|start| self.end - start)
    }
}

/// Intervals per MAC address, iterated in MAC order.
pub type SessionReport = BTreeMap<String, Vec<ConnectionInterval>>;

/// Groups events into one timeline per MAC address.
///
/// Each timeline is stably sorted by time, so events with equal timestamps
/// keep their input order.
#[must_use]
pub fn timelines(events: &[StructuredEvent]) -> BTreeMap<String, DeviceTimeline> {
    let mut timelines: BTreeMap<String, DeviceTimeline> = BTreeMap::new();

    for event in events {
        timelines
            .entry(event.mac.clone())
            .or_insert_with(|| DeviceTimeline::new(event.mac.as_str()))
            .transitions
            .push(Transition {
                at: event.timestamp,
                is_login: event.action == Action::Login,
            });
    }

    for timeline in timelines.values_mut() {
        timeline.transitions.sort_by_key(|t| t.at);
    }

    timelines
}

/// Reconstructs the closed sessions of every device.
#[must_use]
pub fn reconstruct(events: &[StructuredEvent], orphans: OrphanLogoutPolicy) -> SessionReport {
    let report: SessionReport = timelines(events)
        .into_iter()
        .map(|(mac, timeline)| (mac, timeline.intervals(orphans)))
        .collect();

    debug!(
        events = events.len(),
        devices = report.len(),
        intervals = report.values().map(Vec::len).sum::<usize>(),
        "Reconstructed sessions"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const MAC: &str = "AA:BB:CC:DD:EE:FF";

    fn t(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 4, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn event(mac: &str, hour: u32, action: Action) -> StructuredEvent {
        StructuredEvent {
            timestamp: t(hour),
            action,
            mac: mac.to_string(),
            name: None,
            mbits: action.is_login().then_some(300),
        }
    }

    fn spans(report: &SessionReport, mac: &str) -> Vec<(Option<NaiveDateTime>, NaiveDateTime)> {
        report[mac].iter().map(|i| (i.start, i.end)).collect()
    }

    #[test]
    fn test_two_sessions() {
        let events = [
            event(MAC, 1, Action::Login),
            event(MAC, 2, Action::Logout),
            event(MAC, 3, Action::Login),
            event(MAC, 4, Action::Logout),
        ];
        let report = reconstruct(&events, OrphanLogoutPolicy::Keep);
        assert_eq!(
            spans(&report, MAC),
            vec![(Some(t(1)), t(2)), (Some(t(3)), t(4))]
        );
    }

    #[test]
    fn test_earliest_login_wins() {
        let events = [
            event(MAC, 1, Action::Login),
            event(MAC, 2, Action::Login),
            event(MAC, 3, Action::Logout),
        ];
        let report = reconstruct(&events, OrphanLogoutPolicy::Keep);
        assert_eq!(spans(&report, MAC), vec![(Some(t(1)), t(3))]);
    }

    #[test]
    fn test_open_session_emits_nothing() {
        let events = [
            event(MAC, 1, Action::Login),
            event(MAC, 2, Action::Logout),
            event(MAC, 3, Action::Login),
        ];
        let report = reconstruct(&events, OrphanLogoutPolicy::Keep);
        assert_eq!(spans(&report, MAC), vec![(Some(t(1)), t(2))]);
    }

    #[test]
    fn test_orphan_logout_kept() {
        let events = [
            event(MAC, 1, Action::Logout),
            event(MAC, 2, Action::Login),
            event(MAC, 3, Action::Logout),
            event(MAC, 4, Action::Logout),
        ];
        let report = reconstruct(&events, OrphanLogoutPolicy::Keep);
        assert_eq!(
            spans(&report, MAC),
            vec![(None, t(1)), (Some(t(2)), t(3)), (Some(t(2)), t(4))]
        );
        assert_eq!(report[MAC][0].duration(), None);
        assert_eq!(report[MAC][1].duration(), Some(Duration::hours(1)));
    }

    #[test]
    fn test_orphan_logout_dropped() {
        let events = [
            event(MAC, 1, Action::Logout),
            event(MAC, 2, Action::Login),
            event(MAC, 3, Action::Logout),
            event(MAC, 4, Action::Logout),
        ];
        let report = reconstruct(&events, OrphanLogoutPolicy::Drop);
        assert_eq!(spans(&report, MAC), vec![(Some(t(2)), t(3))]);
    }

    #[test]
    fn test_devices_are_independent() {
        let other = "11:22:33:44:55:66";
        let events = [
            event(MAC, 1, Action::Login),
            event(other, 2, Action::Login),
            event(MAC, 3, Action::Logout),
            event(other, 4, Action::Logout),
        ];
        let report = reconstruct(&events, OrphanLogoutPolicy::Keep);
        assert_eq!(report.len(), 2);
        assert_eq!(spans(&report, MAC), vec![(Some(t(1)), t(3))]);
        assert_eq!(spans(&report, other), vec![(Some(t(2)), t(4))]);
        // BTreeMap iteration is by MAC.
        assert_eq!(report.keys().next().map(String::as_str), Some(other));
    }

    #[test]
    fn test_timelines_sorted_per_device() {
        let events = [
            event(MAC, 5, Action::Logout),
            event(MAC, 1, Action::Login),
        ];
        let timelines = timelines(&events);
        let timeline = &timelines[MAC];
        assert_eq!(timeline.mac(), MAC);
        assert_eq!(
            timeline.transitions(),
            &[
                Transition { at: t(1), is_login: true },
                Transition { at: t(5), is_login: false },
            ]
        );
    }

    #[test]
    fn test_anchored_intervals_are_ordered() {
        let events = [
            event(MAC, 1, Action::Login),
            event(MAC, 1, Action::Logout),
            event(MAC, 2, Action::Login),
            event(MAC, 9, Action::Logout),
        ];
        let report = reconstruct(&events, OrphanLogoutPolicy::Keep);
        for interval in &report[MAC] {
            let start = interval.start.unwrap();
            assert!(start <= interval.end);
        }
    }
}
