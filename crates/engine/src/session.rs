//! Session lifetime monitor.
//!
//! A session expires a fixed duration after login, regardless of
//! activity; activity is recorded for diagnostics but never extends the
//! lifetime. Expiry clears the stored timestamps, so each session fires
//! exactly one automatic logout. Signals are broadcast so every attached
//! client converges on the same state.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

const SIGNAL_CAPACITY: usize = 16;

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Absolute session lifetime measured from login.
    pub max_lifetime: Duration,
    /// How often the background loop re-evaluates expiry.
    pub check_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_lifetime: Duration::from_secs(5 * 60 * 60),
            check_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoutKind {
    /// The absolute lifetime elapsed.
    Expired,
    /// The user asked to end the session.
    Manual,
}

/// Broadcast to every attached client so all of them converge on the
/// same session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionSignal {
    /// Session ended; clients must drop their local state.
    Cleared,
    /// Session started (or was adopted from another client) at the
    /// carried instant.
    Refreshed(DateTime<Utc>),
}

#[derive(Debug, Default)]
struct SessionState {
    login_time: Option<DateTime<Utc>>,
    last_activity: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct SessionMonitor {
    config: SessionConfig,
    state: Mutex<SessionState>,
    signals: broadcast::Sender<SessionSignal>,
}

impl SessionMonitor {
    pub fn new(config: SessionConfig) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            config,
            state: Mutex::new(SessionState::default()),
            signals,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.signals.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a login at `now`. Keeps the original login time when a
    /// session is already active, so a second client attaching does not
    /// extend the lifetime.
    pub fn login(&self, now: DateTime<Utc>) {
        let mut state = self.lock();
        if state.login_time.is_some() {
            state.last_activity = Some(now);
            return;
        }
        state.login_time = Some(now);
        state.last_activity = Some(now);
        drop(state);
        let _ = self.signals.send(SessionSignal::Refreshed(now));
    }

    /// Adopts a session started elsewhere. A newer timestamp restarts
    /// monitoring from that instant.
    pub fn refresh(&self, login_time: DateTime<Utc>) {
        let mut state = self.lock();
        if state.login_time.is_some_and(|current| current >= login_time) {
            return;
        }
        state.login_time = Some(login_time);
        state.last_activity = Some(login_time);
    }

    /// Records user activity. Does not extend the session lifetime.
    pub fn record_activity(&self, now: DateTime<Utc>) {
        let mut state = self.lock();
        if state.login_time.is_some() {
            state.last_activity = Some(now);
        }
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.lock().last_activity
    }

    pub fn is_active(&self) -> bool {
        self.lock().login_time.is_some()
    }

    /// Evaluates expiry at `now`. Returns `Some(Expired)` exactly once
    /// per session: expiry clears the timestamps, so repeated checks are
    /// no-ops until the next login.
    pub fn check(&self, now: DateTime<Utc>) -> Option<LogoutKind> {
        let mut state = self.lock();
        let login_time = state.login_time?;
        let lifetime = chrono::Duration::from_std(self.config.max_lifetime).ok()?;
        if now - login_time < lifetime {
            return None;
        }
        state.login_time = None;
        state.last_activity = None;
        drop(state);
        let _ = self.signals.send(SessionSignal::Cleared);
        Some(LogoutKind::Expired)
    }

    /// Ends the session on the user's request. A no-op when no session
    /// is active (including after an automatic logout already fired).
    pub fn logout(&self) -> Option<LogoutKind> {
        let mut state = self.lock();
        if state.login_time.is_none() {
            return None;
        }
        state.login_time = None;
        state.last_activity = None;
        drop(state);
        let _ = self.signals.send(SessionSignal::Cleared);
        Some(LogoutKind::Manual)
    }

    /// Background loop re-checking expiry on the configured interval.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.config.check_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if self.check(Utc::now()) == Some(LogoutKind::Expired) {
                tracing::info!("session expired, logging out");
            }
        }
    }
}

impl Default for SessionMonitor {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, hour, minute, 0).unwrap()
    }

    fn monitor() -> SessionMonitor {
        SessionMonitor::new(SessionConfig {
            max_lifetime: Duration::from_secs(5 * 60 * 60),
            check_interval: Duration::from_secs(30),
        })
    }

    #[test]
    fn expires_exactly_once_and_clears_state() {
        let monitor = monitor();
        monitor.login(at(8, 0));

        assert_eq!(monitor.check(at(12, 59)), None);
        assert_eq!(monitor.check(at(13, 0)), Some(LogoutKind::Expired));
        assert_eq!(monitor.check(at(13, 0)), None);
        assert_eq!(monitor.check(at(14, 0)), None);
        assert!(!monitor.is_active());
        assert_eq!(monitor.last_activity(), None);
    }

    #[test]
    fn activity_does_not_extend_the_lifetime() {
        let monitor = monitor();
        monitor.login(at(8, 0));
        monitor.record_activity(at(12, 58));
        assert_eq!(monitor.last_activity(), Some(at(12, 58)));

        assert_eq!(monitor.check(at(13, 0)), Some(LogoutKind::Expired));
    }

    #[test]
    fn second_login_keeps_the_original_login_time() {
        let monitor = monitor();
        monitor.login(at(8, 0));
        monitor.login(at(10, 0));

        assert_eq!(monitor.check(at(13, 0)), Some(LogoutKind::Expired));
    }

    #[test]
    fn manual_logout_suppresses_the_automatic_one() {
        let monitor = monitor();
        monitor.login(at(8, 0));

        assert_eq!(monitor.logout(), Some(LogoutKind::Manual));
        assert_eq!(monitor.logout(), None);
        assert_eq!(monitor.check(at(13, 0)), None);
    }

    #[test]
    fn login_after_expiry_arms_a_fresh_lifetime() {
        let monitor = monitor();
        monitor.login(at(8, 0));
        assert_eq!(monitor.check(at(13, 0)), Some(LogoutKind::Expired));

        monitor.login(at(13, 0));
        assert!(monitor.is_active());
        assert_eq!(monitor.check(at(17, 59)), None);
        assert_eq!(monitor.check(at(18, 0)), Some(LogoutKind::Expired));
    }

    #[test]
    fn refresh_adopts_only_newer_sessions() {
        let monitor = monitor();
        monitor.login(at(8, 0));
        monitor.refresh(at(7, 0));
        assert_eq!(monitor.check(at(13, 0)), Some(LogoutKind::Expired));

        monitor.refresh(at(13, 30));
        assert!(monitor.is_active());
        assert_eq!(monitor.check(at(18, 0)), None);
        assert_eq!(monitor.check(at(18, 30)), Some(LogoutKind::Expired));
    }

    #[test]
    fn check_without_a_session_is_a_no_op() {
        let monitor = monitor();
        assert_eq!(monitor.check(at(13, 0)), None);
        assert!(!monitor.is_active());
    }

    #[tokio::test]
    async fn every_subscriber_sees_the_clear_signal() {
        let monitor = monitor();
        let mut first = monitor.subscribe();
        let mut second = monitor.subscribe();

        monitor.login(at(8, 0));
        assert_eq!(first.recv().await.unwrap(), SessionSignal::Refreshed(at(8, 0)));
        assert_eq!(second.recv().await.unwrap(), SessionSignal::Refreshed(at(8, 0)));

        monitor.check(at(13, 0));
        assert_eq!(first.recv().await.unwrap(), SessionSignal::Cleared);
        assert_eq!(second.recv().await.unwrap(), SessionSignal::Cleared);
    }
}
