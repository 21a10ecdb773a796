use tokio::sync::watch;

/// UI-facing side-channel state for one store.
///
/// Not part of the entity data: `loading` flips on at the start of every
/// operation and off when it resolves, `error`/`success` hold the strings a
/// frontend binds to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Publishes [`StoreStatus`] snapshots over a watch channel.
///
/// One cell per store, shared by every operation on it: concurrent
/// operations on the same store clobber each other's loading and error
/// state. Subscribers observe the latest snapshot only.
#[derive(Debug)]
pub(crate) struct StatusCell {
    tx: watch::Sender<StoreStatus>,
}

impl StatusCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(StoreStatus::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> StoreStatus {
        self.tx.borrow().clone()
    }

    /// Mark an operation as started.
    pub fn begin(&self) {
        self.tx.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    /// Resolve the running operation, optionally with a success message.
    pub fn finish_ok(&self, success: Option<&str>) {
        let success = success.map(str::to_string);
        self.tx.send_modify(|s| {
            s.loading = false;
            s.error = None;
            if success.is_some() {
                s.success = success;
            }
        });
    }

    /// Resolve the running operation with a user-facing error string.
    pub fn finish_err(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
        });
    }

    /// Clear error and success.
    pub fn reset(&self) {
        self.tx.send_modify(|s| {
            s.error = None;
            s.success = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let cell = StatusCell::new();
        cell.finish_err("boom");
        cell.begin();

        let status = cell.snapshot();
        assert!(status.loading);
        assert!(status.error.is_none());
    }

    #[test]
    fn finish_err_records_the_message() {
        let cell = StatusCell::new();
        cell.begin();
        cell.finish_err("Failed to fetch events");

        let status = cell.snapshot();
        assert!(!status.loading);
        assert_eq!(status.error.as_deref(), Some("Failed to fetch events"));
    }

    #[test]
    fn subscribers_observe_the_latest_snapshot() {
        let cell = StatusCell::new();
        let rx = cell.subscribe();
        cell.begin();
        cell.finish_ok(Some("Event Added"));

        let status = rx.borrow().clone();
        assert!(!status.loading);
        assert_eq!(status.success.as_deref(), Some("Event Added"));
    }

    #[test]
    fn reset_clears_both_messages() {
        let cell = StatusCell::new();
        cell.finish_ok(Some("Event Added"));
        cell.finish_err("late failure");
        cell.reset();

        assert_eq!(cell.snapshot(), StoreStatus::default());
    }
}
