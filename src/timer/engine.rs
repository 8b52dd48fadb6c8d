//! Countdown driver
//!
//! `CountdownEngine` is a two-state machine (`Idle` / `Ticking`). While
//! ticking it keeps exactly one sleep task in flight; when the second
//! elapses the task sends a generation-tagged `TickEvent` into the channel
//! consumed by the app event loop, which applies it through `handle_tick`.
//!
//! Every exit from `Ticking` aborts the pending task and bumps the
//! generation, so an event that was already in the channel when the
//! transition happened fails the generation check and does nothing. Ticks
//! never mutate state from the timer task itself; all mutations funnel
//! through the event loop.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::store::TimerStore;
use super::TimerState;

/// Countdown period
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One elapsed second, tagged with the generation that scheduled it
#[derive(Debug, Clone, Copy)]
pub struct TickEvent {
    generation: u64,
}

enum Phase {
    Idle,
    Ticking {
        deadline: Instant,
        task: JoinHandle<()>,
    },
}

/// Periodic decrement driver for a `TimerStore`
pub struct CountdownEngine {
    phase: Phase,
    generation: u64,
    tick_tx: UnboundedSender<TickEvent>,
}

impl CountdownEngine {
    /// Create an engine and the receiving end of its tick channel
    pub fn new() -> (Self, UnboundedReceiver<TickEvent>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        (
            Self {
                phase: Phase::Idle,
                generation: 0,
                tick_tx,
            },
            tick_rx,
        )
    }

    /// Whether a tick is currently scheduled
    pub fn is_ticking(&self) -> bool {
        matches!(self.phase, Phase::Ticking { .. })
    }

    /// Reconcile the engine with the current store state
    ///
    /// Arms a fresh one-second tick when the countdown should be running and
    /// none is scheduled; cancels the pending tick when it should not be.
    /// Safe to call every loop iteration.
    pub fn sync(&mut self, state: &TimerState) {
        let should_tick = state.is_running && !state.time.is_zero();
        match (&self.phase, should_tick) {
            (Phase::Idle, true) => self.arm(Instant::now() + TICK_INTERVAL),
            (Phase::Ticking { .. }, false) => self.disarm(),
            _ => {}
        }
    }

    /// Apply a received tick to the store
    ///
    /// Returns true when the tick was applied, false when it was stale (its
    /// generation was fenced off by a pause, reset, or completion).
    pub fn handle_tick(&mut self, store: &mut TimerStore, event: TickEvent) -> bool {
        let deadline = match &self.phase {
            Phase::Ticking { deadline, .. } if event.generation == self.generation => *deadline,
            _ => {
                tracing::debug!(
                    "Discarding stale tick (generation {}, engine at {})",
                    event.generation,
                    self.generation
                );
                return false;
            }
        };

        store.apply_tick();

        if store.state().is_running && !store.state().time.is_zero() {
            // Schedule from the previous deadline so in-run latency does not
            // accumulate; after a long stall just take the lost time.
            let next = (deadline + TICK_INTERVAL).max(Instant::now());
            self.arm(next);
        } else {
            self.phase = Phase::Idle;
            self.generation += 1;
        }
        true
    }

    /// Cancel any scheduled tick, for app teardown
    pub fn shutdown(&mut self) {
        if self.is_ticking() {
            self.disarm();
        }
    }

    fn arm(&mut self, deadline: Instant) {
        if let Phase::Ticking { task, .. } = &self.phase {
            task.abort();
        }
        let generation = self.generation;
        let tx = self.tick_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(TickEvent { generation });
        });
        self.phase = Phase::Ticking { deadline, task };
    }

    fn disarm(&mut self) {
        if let Phase::Ticking { task, .. } = &self.phase {
            task.abort();
        }
        self.phase = Phase::Idle;
        self.generation += 1;
        tracing::debug!("Tick cancelled (generation now {})", self.generation);
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        // A sleep task left behind would fire into a closed channel, but
        // abort it anyway so nothing outlives the engine.
        if let Phase::Ticking { task, .. } = &self.phase {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerPatch;
    use tokio::sync::mpsc::error::TryRecvError;

    fn running_store(hours: i64, minutes: i64, seconds: i64) -> TimerStore {
        let mut store = TimerStore::new();
        store.set_time(TimerPatch {
            hours: Some(hours),
            minutes: Some(minutes),
            seconds: Some(seconds),
        });
        store.start().unwrap();
        store
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_arms_only_while_running() {
        let (mut engine, _rx) = CountdownEngine::new();
        let mut store = TimerStore::new();

        engine.sync(store.state());
        assert!(!engine.is_ticking());

        store.set_time(TimerPatch::seconds(3));
        engine.sync(store.state());
        assert!(!engine.is_ticking(), "not running yet");

        store.start().unwrap();
        engine.sync(store.state());
        assert!(engine.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_decrements_through_the_store() {
        let (mut engine, mut rx) = CountdownEngine::new();
        let mut store = running_store(0, 0, 2);
        engine.sync(store.state());

        tokio::time::advance(TICK_INTERVAL).await;
        let event = rx.recv().await.unwrap();
        assert!(engine.handle_tick(&mut store, event));
        assert_eq!(store.state().time.total_seconds(), 1);
        assert!(store.state().is_running);
        assert!(engine.is_ticking(), "re-armed for the next second");

        tokio::time::advance(TICK_INTERVAL).await;
        let event = rx.recv().await.unwrap();
        assert!(engine.handle_tick(&mut store, event));
        assert!(store.state().time.is_zero());
        assert!(!store.state().is_running);
        assert!(!engine.is_ticking(), "terminal at zero");
    }

    #[tokio::test(start_paused = true)]
    async fn test_minute_borrow_scenario() {
        let (mut engine, mut rx) = CountdownEngine::new();
        let mut store = running_store(0, 1, 0);
        engine.sync(store.state());

        tokio::time::advance(TICK_INTERVAL).await;
        let event = rx.recv().await.unwrap();
        engine.handle_tick(&mut store, event);
        assert_eq!(store.state().time.total_seconds(), 59);
        assert_eq!(store.state().time.minutes, 0);
        assert_eq!(store.state().time.seconds, 59);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_already_in_channel_is_stale_after_pause() {
        let (mut engine, mut rx) = CountdownEngine::new();
        let mut store = running_store(0, 0, 5);
        engine.sync(store.state());

        // Let the tick fire and sit in the channel, then pause before it is
        // consumed.
        tokio::time::advance(TICK_INTERVAL).await;
        let event = rx.recv().await.unwrap();

        store.pause();
        engine.sync(store.state());
        assert!(!engine.is_ticking());

        assert!(!engine.handle_tick(&mut store, event));
        assert_eq!(store.state().time.total_seconds(), 5, "stale tick must not mutate");
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_aborts_the_pending_task() {
        let (mut engine, mut rx) = CountdownEngine::new();
        let mut store = running_store(0, 0, 5);
        engine.sync(store.state());

        store.pause();
        engine.sync(store.state());

        tokio::time::advance(TICK_INTERVAL * 3).await;
        tokio::task::yield_now().await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_forged_tick_while_idle_is_rejected() {
        let (mut engine, _rx) = CountdownEngine::new();
        let mut store = TimerStore::new();

        let applied = engine.handle_tick(&mut store, TickEvent { generation: 0 });
        assert!(!applied);
        assert!(store.state().time.is_zero());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_uses_a_fresh_generation() {
        let (mut engine, mut rx) = CountdownEngine::new();
        let mut store = running_store(0, 0, 5);
        engine.sync(store.state());

        tokio::time::advance(TICK_INTERVAL).await;
        let old = rx.recv().await.unwrap();

        store.pause();
        engine.sync(store.state());
        store.start().unwrap();
        engine.sync(store.state());

        // The pre-pause event is dead even though the engine is ticking again.
        assert!(!engine.handle_tick(&mut store, old));
        assert_eq!(store.state().time.total_seconds(), 5);

        tokio::time::advance(TICK_INTERVAL).await;
        let fresh = rx.recv().await.unwrap();
        assert!(engine.handle_tick(&mut store, fresh));
        assert_eq!(store.state().time.total_seconds(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_terminates_after_exact_tick_count() {
        let (mut engine, mut rx) = CountdownEngine::new();
        let mut store = running_store(0, 0, 5);
        engine.sync(store.state());

        let mut applied = 0;
        while engine.is_ticking() {
            tokio::time::advance(TICK_INTERVAL).await;
            let event = rx.recv().await.unwrap();
            if engine.handle_tick(&mut store, event) {
                applied += 1;
            }
        }
        assert_eq!(applied, 5);
        assert!(store.state().time.is_zero());
        assert!(!store.state().is_running);

        // Terminal: nothing left scheduled.
        tokio::time::advance(TICK_INTERVAL * 2).await;
        tokio::task::yield_now().await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_the_pending_tick() {
        let (mut engine, mut rx) = CountdownEngine::new();
        let store = running_store(0, 0, 5);
        engine.sync(store.state());

        drop(engine);
        tokio::time::advance(TICK_INTERVAL * 2).await;
        assert!(rx.recv().await.is_none(), "channel closes without a tick");
    }
}
