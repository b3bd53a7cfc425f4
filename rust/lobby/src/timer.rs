//! Per-turn countdown.
//!
//! Each human turn gets one [`TurnTimer`]: a tokio task that sleeps for the
//! turn timeout and then runs its expiry callback. The task and the player
//! race on a shared [`TurnGuard`]; only the side that flips it first gets to
//! act on the turn.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jetons_engine::TurnTicket;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Single-assignment "turn resolved" flag.
#[derive(Debug, Default)]
pub struct TurnGuard {
    resolved: AtomicBool,
}

impl TurnGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the turn. Returns `true` for the first caller only.
    pub fn resolve(&self) -> bool {
        self.resolved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct TurnTimer {
    ticket: TurnTicket,
    guard: Arc<TurnGuard>,
    handle: Option<JoinHandle<()>>,
}

impl TurnTimer {
    /// Starts the countdown for `ticket`. `on_expire` runs at most once, and
    /// only if nothing resolved the guard first.
    ///
    /// Outside a tokio runtime no task is spawned and the turn never expires.
    pub fn start<F>(ticket: TurnTicket, timeout: Duration, on_expire: F) -> Self
    where
        F: FnOnce(TurnTicket) + Send + 'static,
    {
        let guard = Arc::new(TurnGuard::new());
        let handle = Handle::try_current().ok().map(|runtime| {
            let guard = Arc::clone(&guard);
            runtime.spawn(async move {
                tokio::time::sleep(timeout).await;
                if guard.resolve() {
                    on_expire(ticket);
                }
            })
        });
        if handle.is_none() {
            tracing::warn!(
                player_id = %ticket.player_id,
                "no async runtime, turn timer disabled"
            );
        }
        Self {
            ticket,
            guard,
            handle,
        }
    }

    pub fn ticket(&self) -> TurnTicket {
        self.ticket
    }

    pub fn is_resolved(&self) -> bool {
        self.guard.is_resolved()
    }

    /// Resolves the turn on behalf of the player and stops the countdown.
    /// Returns `false` if the timer had already fired.
    pub fn cancel(mut self) -> bool {
        let won = self.guard.resolve();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        won
    }
}

impl Drop for TurnTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetons_engine::PlayerId;
    use std::sync::atomic::AtomicUsize;

    fn ticket() -> TurnTicket {
        TurnTicket {
            player_id: PlayerId(1),
            seq: 1,
        }
    }

    #[test]
    fn guard_resolves_once() {
        let guard = TurnGuard::new();
        assert!(!guard.is_resolved());
        assert!(guard.resolve());
        assert!(!guard.resolve());
        assert!(guard.is_resolved());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_fires_after_timeout() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let timer = TurnTimer::start(ticket(), Duration::from_secs(20), move |t| {
            assert_eq!(t, ticket());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(19)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(timer.is_resolved());
        assert!(!timer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let timer = TurnTimer::start(ticket(), Duration::from_secs(20), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(timer.cancel());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn without_runtime_the_turn_never_expires() {
        let timer = TurnTimer::start(ticket(), Duration::from_millis(1), |_| {
            panic!("must not fire");
        });
        assert!(!timer.is_resolved());
        assert!(timer.cancel());
    }
}
