//! Inactivity timer: forced logout after a period with no user activity.
//!
//! One background task owns the only deadline. Activity signals arrive over a
//! channel; each one drops the pending sleep and arms a fresh one, so resets
//! never stack. When the deadline passes the task logs out, emits a single
//! [`ForcedLogout`] and exits.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use stockmaster_auth::LOGIN_PATH;

use crate::session::SessionGuard;

/// User-activity signals that keep the session alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySignal {
    PointerMove,
    KeyPress,
    Click,
    Scroll,
}

/// Emitted once when the timer expires, after the session was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedLogout {
    pub redirect_to: &'static str,
}

/// Handle to a running inactivity timer. Dropping it cancels the timer
/// without touching the session.
#[derive(Debug)]
pub struct InactivityTimer {
    activity: mpsc::UnboundedSender<ActivitySignal>,
    task: JoinHandle<()>,
}

impl InactivityTimer {
    /// Arm the timer, but only if `guard` has a usable session right now.
    ///
    /// `on_expire` runs at most once, after logout.
    pub fn start<F>(guard: SessionGuard, timeout: Duration, on_expire: F) -> Option<Self>
    where
        F: FnOnce(ForcedLogout) + Send + 'static,
    {
        if !guard.is_authenticated() {
            tracing::debug!("no active session; inactivity timer not started");
            return None;
        }

        let (activity, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(guard, timeout, rx, on_expire));
        tracing::debug!(timeout_secs = timeout.as_secs(), "inactivity timer armed");

        Some(Self { activity, task })
    }

    /// Report user activity; postpones the deadline by a full timeout.
    pub fn record(&self, signal: ActivitySignal) {
        // A closed channel means the timer already fired.
        let _ = self.activity.send(signal);
    }

    pub fn has_fired(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for InactivityTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<F>(
    guard: SessionGuard,
    timeout: Duration,
    mut activity: mpsc::UnboundedReceiver<ActivitySignal>,
    on_expire: F,
) where
    F: FnOnce(ForcedLogout),
{
    loop {
        tokio::select! {
            signal = activity.recv() => match signal {
                Some(signal) => tracing::trace!(?signal, "activity; inactivity deadline reset"),
                None => return,
            },
            () = tokio::time::sleep(timeout) => {
                guard.logout();
                tracing::warn!("session closed after inactivity");
                on_expire(ForcedLogout { redirect_to: LOGIN_PATH });
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::{guard_with_store, token_with_exp};
    use crate::storage::{SessionStore, TOKEN_KEY, USER_KEY};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TIMEOUT: Duration = Duration::from_secs(110);

    fn signed_in() -> (SessionGuard, Arc<crate::storage::MemoryStore>) {
        let (guard, store) = guard_with_store();
        // Far enough ahead that the paused clock never reaches it.
        store.set(TOKEN_KEY, &token_with_exp(chrono::Utc::now().timestamp() + 86_400));
        store.set(USER_KEY, r#"{"id":1,"role":"OPERADOR"}"#);
        (guard, store)
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce(ForcedLogout) + Send + 'static) {
        let fired = Arc::new(AtomicUsize::new(0));
        let hook = fired.clone();
        (fired, move |event: ForcedLogout| {
            assert_eq!(event.redirect_to, "/login");
            hook.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn not_started_without_session() {
        let (guard, _store) = guard_with_store();
        let (_fired, hook) = counter();
        assert!(InactivityTimer::start(guard, TIMEOUT, hook).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn activity_before_deadline_prevents_logout() {
        let (guard, store) = signed_in();
        let (fired, hook) = counter();
        let timer = InactivityTimer::start(guard, TIMEOUT, hook).unwrap();

        for signal in [
            ActivitySignal::PointerMove,
            ActivitySignal::KeyPress,
            ActivitySignal::Click,
            ActivitySignal::Scroll,
        ] {
            tokio::time::sleep(Duration::from_secs(100)).await;
            timer.record(signal);
        }
        tokio::time::sleep(Duration::from_secs(100)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(store.get(TOKEN_KEY).is_some());
        assert!(!timer.has_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_is_logged_out_exactly_once() {
        let (guard, store) = signed_in();
        let (fired, hook) = counter();
        let timer = InactivityTimer::start(guard, TIMEOUT, hook).unwrap();

        tokio::time::sleep(TIMEOUT + Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(store.is_empty());

        // Late activity does not re-arm anything.
        timer.record(ActivitySignal::Click);
        tokio::time::sleep(TIMEOUT * 3).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_reschedules_instead_of_stacking() {
        let (guard, _store) = signed_in();
        let (fired, hook) = counter();
        let timer = InactivityTimer::start(guard, TIMEOUT, hook).unwrap();

        tokio::time::sleep(Duration::from_secs(60)).await;
        timer.record(ActivitySignal::KeyPress);
        // First deadline (110s) passes without firing.
        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        // Rescheduled deadline (60 + 110) passes.
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_keeps_the_session() {
        let (guard, store) = signed_in();
        let (fired, hook) = counter();
        let timer = InactivityTimer::start(guard, TIMEOUT, hook).unwrap();
        drop(timer);

        tokio::time::sleep(TIMEOUT * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(store.get(TOKEN_KEY).is_some());
    }
}
