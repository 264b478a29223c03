//! Refresh bridge between mutation actions and list views.
//!
//! A mutation that makes a list stale bumps the bridge; every engine
//! subscribed to it re-fetches its full current query. The key carries no
//! payload beyond "something changed".

use std::fmt;

use tokio::sync::watch;

type RefreshCallback = Box<dyn Fn(u64) + Send + Sync>;

pub struct RefreshBridge {
    sender: watch::Sender<u64>,
    on_refresh: Option<RefreshCallback>,
}

impl fmt::Debug for RefreshBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshBridge")
            .field("key", &self.key())
            .finish_non_exhaustive()
    }
}

impl Default for RefreshBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshBridge {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender,
            on_refresh: None,
        }
    }

    /// Calls `callback` with the new key after every bump.
    pub fn with_callback(mut self, callback: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.on_refresh = Some(Box::new(callback));
        self
    }

    /// Marks subscribed views stale. Returns the new key.
    pub fn bump(&self) -> u64 {
        let mut next = 0;
        self.sender.send_modify(|key| {
            *key += 1;
            next = *key;
        });
        if let Some(callback) = &self.on_refresh {
            callback(next);
        }
        next
    }

    pub fn key(&self) -> u64 {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> RefreshKey {
        RefreshKey {
            receiver: Some(self.sender.subscribe()),
        }
    }
}

/// Receiving side of a [`RefreshBridge`], owned by one engine.
#[derive(Debug)]
pub struct RefreshKey {
    receiver: Option<watch::Receiver<u64>>,
}

impl RefreshKey {
    /// A key that never changes, for views without mutation actions.
    pub fn detached() -> Self {
        Self { receiver: None }
    }

    pub fn current(&self) -> u64 {
        self.receiver.as_ref().map(|rx| *rx.borrow()).unwrap_or(0)
    }

    /// Resolves on the next bump. Never resolves once the bridge is gone.
    pub async fn changed(&mut self) {
        if let Some(receiver) = self.receiver.as_mut() {
            if receiver.changed().await.is_ok() {
                return;
            }
            self.receiver = None;
        }
        std::future::pending::<()>().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[test]
    fn bump_increments_and_notifies() {
        let seen = Arc::new(AtomicU64::new(0));
        let sink = seen.clone();
        let bridge = RefreshBridge::new().with_callback(move |key| sink.store(key, Ordering::SeqCst));

        assert_eq!(bridge.key(), 0);
        assert_eq!(bridge.bump(), 1);
        assert_eq!(bridge.bump(), 2);
        assert_eq!(bridge.key(), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn subscribers_wake_on_bump() {
        let bridge = RefreshBridge::new();
        let mut key = bridge.subscribe();

        bridge.bump();
        key.changed().await;

        assert_eq!(key.current(), 1);
    }

    #[tokio::test]
    async fn dropped_bridge_never_wakes() {
        let bridge = RefreshBridge::new();
        let mut key = bridge.subscribe();
        drop(bridge);

        let woke = tokio::time::timeout(std::time::Duration::from_millis(20), key.changed()).await;

        assert!(woke.is_err());
        assert_eq!(RefreshKey::detached().current(), 0);
    }
}
