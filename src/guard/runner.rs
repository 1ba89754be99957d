use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::guard::GuardEffect;
use crate::navigation::{Navigation, Navigator, Notifier};

/// Source of delays for scheduled redirects
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Executes guard effects for one mounted page.
///
/// Delayed redirects run on their own task and re-check the mounted flag
/// once the delay is over; a page that unmounted in between never navigates.
pub struct GuardRunner {
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    mounted: Arc<AtomicBool>,
}

impl GuardRunner {
    pub fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifier,
            navigator,
            clock,
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Run `effects` in order. Notices and immediate navigations happen
    /// before this returns; delayed ones are spawned and their handles
    /// returned. Must be called from within a tokio runtime when any
    /// navigation is delayed.
    pub fn apply(&self, effects: Vec<GuardEffect>) -> Vec<JoinHandle<()>> {
        let mut pending = Vec::new();

        if !self.is_mounted() {
            tracing::debug!(count = effects.len(), "guard effects dropped, page unmounted");
            return pending;
        }

        for effect in effects {
            match effect {
                GuardEffect::Notify(notice) => self.notifier.notify(notice),
                GuardEffect::Navigate { to, after } if after.is_zero() => self.navigator.navigate(to),
                GuardEffect::Navigate { to, after } => pending.push(self.schedule(to, after)),
            }
        }

        pending
    }

    fn schedule(&self, to: Navigation, after: Duration) -> JoinHandle<()> {
        let navigator = self.navigator.clone();
        let clock = self.clock.clone();
        let mounted = self.mounted.clone();

        tokio::spawn(async move {
            clock.sleep(after).await;
            if mounted.load(Ordering::SeqCst) {
                navigator.navigate(to);
            } else {
                tracing::debug!(path = to.path(), "pending redirect dropped, page unmounted");
            }
        })
    }
}

impl Drop for GuardRunner {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{GuardRequirement, GuardSettings, RouteGuard};
    use crate::navigation::Notice;
    use crate::session::SessionState;
    use crate::testing::{standard_user, RecordingClock, RecordingNavigator, RecordingNotifier};

    fn runner(clock: Arc<RecordingClock>) -> (GuardRunner, Arc<RecordingNotifier>, Arc<RecordingNavigator>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let runner = GuardRunner::new(notifier.clone(), navigator.clone(), clock);
        (runner, notifier, navigator)
    }

    fn denied_effects() -> Vec<GuardEffect> {
        let mut guard = RouteGuard::new(
            GuardRequirement::new("users").redirect_to("/dashboard"),
            GuardSettings::default(),
        );
        guard.observe(&SessionState::Authenticated(Arc::new(standard_user(&[]))))
    }

    #[tokio::test]
    async fn test_denial_notifies_then_redirects_after_delay() {
        let clock = Arc::new(RecordingClock::default());
        let (runner, notifier, navigator) = runner(clock.clone());

        let pending = runner.apply(denied_effects());
        assert_eq!(notifier.notices(), vec![Notice::AccessDenied { module_key: "users".into() }]);
        assert_eq!(pending.len(), 1);

        for handle in pending {
            handle.await.unwrap();
        }

        assert_eq!(clock.sleeps(), vec![Duration::from_millis(1000)]);
        assert_eq!(navigator.history(), vec![Navigation::Client("/dashboard".into())]);
    }

    #[tokio::test]
    async fn test_immediate_navigation_runs_inline() {
        let clock = Arc::new(RecordingClock::default());
        let (runner, notifier, navigator) = runner(clock.clone());

        let mut guard = RouteGuard::new(GuardRequirement::new("users"), GuardSettings::default());
        let pending = runner.apply(guard.observe(&SessionState::Anonymous));

        assert!(pending.is_empty());
        assert!(clock.sleeps().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::LoginRequired]);
        assert_eq!(navigator.history(), vec![Navigation::Client("/login".into())]);
    }

    #[tokio::test]
    async fn test_unmount_before_delay_drops_redirect() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let clock = Arc::new(RecordingClock::gated(gate.clone()));
        let (runner, _, navigator) = runner(clock);

        let pending = runner.apply(denied_effects());
        runner.unmount();
        gate.notify_one();

        for handle in pending {
            handle.await.unwrap();
        }
        assert!(navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_dropping_runner_counts_as_unmount() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let clock = Arc::new(RecordingClock::gated(gate.clone()));
        let (runner, _, navigator) = runner(clock);

        let pending = runner.apply(denied_effects());
        drop(runner);
        gate.notify_one();

        for handle in pending {
            handle.await.unwrap();
        }
        assert!(navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_unmounted_runner_ignores_new_effects() {
        let clock = Arc::new(RecordingClock::default());
        let (runner, notifier, navigator) = runner(clock);
        runner.unmount();

        assert!(runner.apply(denied_effects()).is_empty());
        assert!(notifier.notices().is_empty());
        assert!(navigator.history().is_empty());
    }
}
