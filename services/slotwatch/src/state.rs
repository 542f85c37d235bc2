//! Shared slot availability state observed by dashboard and overlay views

use tokio::sync::watch;

/// Snapshot of the slot availability exposed to consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotState {
    /// Remaining signup slots. `None` until the first successful fetch.
    /// Not clamped: goes negative when registrations exceed capacity.
    pub slots_left: Option<i64>,
    /// True while a fetch against the backend is outstanding
    pub loading: bool,
}

impl SlotState {
    fn unset() -> Self {
        Self {
            slots_left: None,
            loading: false,
        }
    }
}

/// Handle around the watch channel carrying the slot state.
///
/// The sender side is owned by the tracker; consumers get receivers via
/// [`SlotsHandle::subscribe`] and are notified on every mutation.
#[derive(Debug)]
pub struct SlotsHandle {
    tx: watch::Sender<SlotState>,
}

impl SlotsHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SlotState::unset());
        Self { tx }
    }

    /// Current state, cloned out of the channel
    pub fn snapshot(&self) -> SlotState {
        self.tx.borrow().clone()
    }

    /// New receiver observing all subsequent mutations
    pub fn subscribe(&self) -> watch::Receiver<SlotState> {
        self.tx.subscribe()
    }

    /// Try to claim the single in-flight fetch slot.
    ///
    /// Returns false without touching the state when a fetch is already in
    /// flight, or when a value is cached and `force` is not set. The guard
    /// check and the `loading` flip happen inside one `send_if_modified`
    /// closure, so concurrent callers cannot both claim the slot.
    pub fn try_begin_fetch(&self, force: bool) -> bool {
        self.tx.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            if !force && state.slots_left.is_some() {
                return false;
            }
            state.loading = true;
            true
        })
    }

    /// Finish the fetch claimed by [`SlotsHandle::try_begin_fetch`].
    ///
    /// `slots_left` carries the freshly computed value on success; `None`
    /// means the fetch failed and the previous value is kept.
    pub fn finish_fetch(&self, slots_left: Option<i64>) {
        self.tx.send_modify(|state| {
            if let Some(value) = slots_left {
                state.slots_left = Some(value);
            }
            state.loading = false;
        });
    }
}

impl Default for SlotsHandle {
    fn default() -> Self {
        Self::new()
    }
}
