//! Canonical timer state and its observers
//!
//! `TimerStore` is the single owner of `TimerState`. Every mutation goes
//! through a command method here, commits exactly once, and synchronously
//! notifies the registered listeners in registration order. The countdown
//! engine routes its ticks through `apply_tick` so a tick is one committed
//! mutation like any other.

use uuid::Uuid;

use super::{
    coerce_unit, BrandingAsset, BrandingSlot, TimerPatch, TimerState, ValidationError, MAX_HOURS,
    MAX_MIN_SEC,
};

/// Identifier returned by `subscribe`, used to unsubscribe later
pub type ListenerId = Uuid;

/// Listener invoked with a state snapshot after each committed mutation
pub type Listener = Box<dyn FnMut(&TimerState)>;

/// Owner of the canonical `TimerState`
pub struct TimerStore {
    state: TimerState,
    listeners: Vec<(ListenerId, Listener)>,
}

impl std::fmt::Debug for TimerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TimerStore {
    /// Create a store at the initial state: zero time, not running, no logos
    pub fn new() -> Self {
        Self {
            state: TimerState::default(),
            listeners: Vec::new(),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Register a listener; it will see every committed mutation from now on
    pub fn subscribe(&mut self, listener: impl FnMut(&TimerState) + 'static) -> ListenerId {
        let id = Uuid::new_v4();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Merge a partial time update into the current value
    ///
    /// Unspecified fields keep their value; out-of-range inputs coerce to 0.
    /// Never fails, even while running (the control layer decides whether
    /// editing is allowed).
    pub fn set_time(&mut self, patch: TimerPatch) {
        let time = &mut self.state.time;
        if let Some(raw) = patch.hours {
            time.hours = coerce_unit(raw, MAX_HOURS);
        }
        if let Some(raw) = patch.minutes {
            time.minutes = coerce_unit(raw, MAX_MIN_SEC);
        }
        if let Some(raw) = patch.seconds {
            time.seconds = coerce_unit(raw, MAX_MIN_SEC);
        }
        self.commit();
    }

    /// Begin the countdown
    ///
    /// Rejected without any state change (and without notifying) when the
    /// configured duration is zero.
    pub fn start(&mut self) -> Result<(), ValidationError> {
        if self.state.time.is_zero() {
            tracing::debug!("Start rejected: duration is zero");
            return Err(ValidationError::EmptyDuration);
        }
        self.state.is_running = true;
        tracing::info!("Timer started at {}", self.state.time.total_seconds());
        self.commit();
        Ok(())
    }

    /// Halt the countdown, preserving the remaining time
    pub fn pause(&mut self) {
        self.state.is_running = false;
        self.commit();
    }

    /// Halt the countdown and clear the remaining time
    pub fn reset(&mut self) {
        self.state.is_running = false;
        self.state.time = Default::default();
        tracing::info!("Timer reset");
        self.commit();
    }

    /// Put an asset into a branding slot (or clear it with `None`)
    ///
    /// Returns the asset that was displaced so the caller can revoke its
    /// staged resource.
    pub fn set_branding(
        &mut self,
        slot: BrandingSlot,
        asset: Option<BrandingAsset>,
    ) -> Option<BrandingAsset> {
        let target = match slot {
            BrandingSlot::Org => &mut self.state.org_logo,
            BrandingSlot::Event => &mut self.state.event_logo,
        };
        let previous = std::mem::replace(target, asset);
        if let Some(current) = target.as_ref() {
            tracing::info!("Branding {} set to {}", slot.label(), current.name);
        } else if previous.is_some() {
            tracing::info!("Branding {} cleared", slot.label());
        }
        self.commit();
        previous
    }

    /// Apply one engine tick as a single committed mutation
    ///
    /// Decrements the remaining time by one second; the tick that reaches
    /// zero also stops the countdown. Ticking a zero value is a no-op (the
    /// engine never schedules one, but a stray call must stay harmless).
    pub fn apply_tick(&mut self) {
        if self.state.time.is_zero() {
            return;
        }
        self.state.time = self.state.time.decrement();
        if self.state.time.is_zero() {
            self.state.is_running = false;
            tracing::info!("Countdown complete");
        }
        self.commit();
    }

    fn commit(&mut self) {
        let snapshot = self.state.clone();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl Default for TimerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerValue;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn asset(name: &str) -> BrandingAsset {
        BrandingAsset {
            uri: format!("file:///tmp/{name}"),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_initial_state() {
        let store = TimerStore::new();
        assert!(store.state().time.is_zero());
        assert!(!store.state().is_running);
        assert!(store.state().org_logo.is_none());
        assert!(store.state().event_logo.is_none());
    }

    #[test]
    fn test_set_time_merges_partial_updates() {
        let mut store = TimerStore::new();
        store.set_time(TimerPatch::minutes(5));
        store.set_time(TimerPatch::seconds(30));
        assert_eq!(store.state().time, TimerValue::new(0, 5, 30));

        store.set_time(TimerPatch::hours(1));
        assert_eq!(store.state().time, TimerValue::new(1, 5, 30));
    }

    #[test]
    fn test_set_time_coerces_out_of_range_to_zero() {
        let mut store = TimerStore::new();
        store.set_time(TimerPatch {
            hours: Some(24),
            minutes: Some(60),
            seconds: Some(-3),
        });
        assert!(store.state().time.is_zero());
    }

    #[test]
    fn test_start_with_zero_time_is_rejected() {
        let mut store = TimerStore::new();
        assert_eq!(store.start(), Err(ValidationError::EmptyDuration));
        assert!(!store.state().is_running);
    }

    #[test]
    fn test_failed_start_does_not_notify() {
        let mut store = TimerStore::new();
        let calls = Rc::new(RefCell::new(0usize));
        let calls_in = Rc::clone(&calls);
        store.subscribe(move |_| *calls_in.borrow_mut() += 1);

        let _ = store.start();
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_start_pause_preserves_time() {
        let mut store = TimerStore::new();
        store.set_time(TimerPatch::seconds(10));
        store.start().unwrap();
        assert!(store.state().is_running);

        store.pause();
        assert!(!store.state().is_running);
        assert_eq!(store.state().time, TimerValue::new(0, 0, 10));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut store = TimerStore::new();
        store.set_time(TimerPatch::minutes(2));
        store.start().unwrap();

        store.reset();
        let after_one = store.state().clone();
        store.reset();
        assert_eq!(store.state(), &after_one);
        assert!(after_one.time.is_zero());
        assert!(!after_one.is_running);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut store = TimerStore::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order_in = Rc::clone(&order);
            store.subscribe(move |_| order_in.borrow_mut().push(tag));
        }

        store.pause();
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut store = TimerStore::new();
        let calls = Rc::new(RefCell::new(0usize));
        let calls_in = Rc::clone(&calls);
        let id = store.subscribe(move |_| *calls_in.borrow_mut() += 1);

        store.pause();
        assert_eq!(*calls.borrow(), 1);

        assert!(store.unsubscribe(id));
        store.pause();
        assert_eq!(*calls.borrow(), 1);

        // second removal reports the id as unknown
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_tick_is_one_notification_with_consistent_snapshot() {
        let mut store = TimerStore::new();
        store.set_time(TimerPatch::minutes(1));
        store.start().unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        store.subscribe(move |state| seen_in.borrow_mut().push(state.clone()));

        store.apply_tick();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].time, TimerValue::new(0, 0, 59));
        assert!(seen[0].is_running);
    }

    #[test]
    fn test_tick_reaching_zero_stops_the_run() {
        let mut store = TimerStore::new();
        store.set_time(TimerPatch::seconds(1));
        store.start().unwrap();

        store.apply_tick();
        assert!(store.state().time.is_zero());
        assert!(!store.state().is_running);
    }

    #[test]
    fn test_tick_on_zero_is_a_no_op() {
        let mut store = TimerStore::new();
        let calls = Rc::new(RefCell::new(0usize));
        let calls_in = Rc::clone(&calls);
        store.subscribe(move |_| *calls_in.borrow_mut() += 1);

        store.apply_tick();
        assert!(store.state().time.is_zero());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_termination_after_exactly_total_seconds_ticks() {
        for start in [
            TimerValue::new(0, 0, 5),
            TimerValue::new(0, 2, 0),
            TimerValue::new(1, 0, 1),
        ] {
            let mut store = TimerStore::new();
            store.set_time(TimerPatch {
                hours: Some(i64::from(start.hours)),
                minutes: Some(i64::from(start.minutes)),
                seconds: Some(i64::from(start.seconds)),
            });
            store.start().unwrap();

            let total = start.total_seconds();
            for n in 1..=total {
                assert!(store.state().is_running, "stopped early at tick {n}");
                store.apply_tick();
            }
            assert!(store.state().time.is_zero());
            assert!(!store.state().is_running);
        }
    }

    #[test]
    fn test_set_branding_returns_displaced_asset() {
        let mut store = TimerStore::new();
        assert_eq!(store.set_branding(BrandingSlot::Org, Some(asset("a.png"))), None);

        let displaced = store.set_branding(BrandingSlot::Org, Some(asset("b.png")));
        assert_eq!(displaced, Some(asset("a.png")));

        let displaced = store.set_branding(BrandingSlot::Org, None);
        assert_eq!(displaced, Some(asset("b.png")));
        assert!(store.state().org_logo.is_none());
    }

    #[test]
    fn test_branding_slots_are_isolated() {
        let mut store = TimerStore::new();
        store.set_branding(BrandingSlot::Org, Some(asset("org.png")));
        store.set_branding(BrandingSlot::Event, Some(asset("event.png")));

        store.set_branding(BrandingSlot::Org, None);
        assert!(store.state().org_logo.is_none());
        assert_eq!(store.state().event_logo, Some(asset("event.png")));
    }
}
