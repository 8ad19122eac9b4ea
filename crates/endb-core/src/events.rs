//! Fault channel for asynchronous backend errors.
//!
//! Adapters publish connectivity failures on a [`FaultBus`] in addition to
//! failing the call that hit them. Subscribers receive every fault published
//! after they subscribed; a fault is not necessarily correlated with a
//! specific pending call.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::error::StoreError;

/// Default channel capacity for a fault bus.
pub const DEFAULT_FAULT_CAPACITY: usize = 64;

/// A backend fault with the context it happened in.
#[derive(Debug, Clone)]
pub struct StoreFault {
    /// Adapter name (e.g. `"postgres"`).
    pub adapter: &'static str,
    /// Namespace of the adapter that faulted.
    pub namespace: String,
    /// The operation in flight (e.g. `"connect"`, `"get"`).
    pub operation: &'static str,
    /// The physical key involved, when there was one.
    pub key: Option<String>,
    /// The underlying error.
    pub error: StoreError,
}

/// Broadcast channel of [`StoreFault`]s.
#[derive(Debug, Clone)]
pub struct FaultBus {
    sender: broadcast::Sender<Arc<StoreFault>>,
}

impl FaultBus {
    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FAULT_CAPACITY)
    }

    /// Create a bus with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a fault.
    ///
    /// Returns the number of receivers that got it.
    pub fn publish(&self, fault: StoreFault) -> usize {
        warn!(
            adapter = fault.adapter,
            namespace = %fault.namespace,
            operation = fault.operation,
            key = fault.key.as_deref(),
            error = %fault.error,
            "Backend fault"
        );
        if let Ok(count) = self.sender.send(Arc::new(fault)) {
            count
        } else {
            trace!("No receivers for fault");
            0
        }
    }

    /// Subscribe to faults published from now on.
    #[must_use]
    pub fn subscribe(&self) -> FaultReceiver {
        FaultReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for FaultBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of a [`FaultBus`].
#[derive(Debug)]
pub struct FaultReceiver {
    receiver: broadcast::Receiver<Arc<StoreFault>>,
}

impl FaultReceiver {
    /// Receive the next fault.
    ///
    /// Returns `None` once every sender is gone. Faults dropped because the
    /// receiver lagged are skipped.
    pub async fn recv(&mut self) -> Option<Arc<StoreFault>> {
        loop {
            match self.receiver.recv().await {
                Ok(fault) => return Some(fault),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(skipped = count, "Fault receiver lagged, faults dropped");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive a fault if one is queued.
    pub fn try_recv(&mut self) -> Option<Arc<StoreFault>> {
        loop {
            match self.receiver.try_recv() {
                Ok(fault) => return Some(fault),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(skipped = count, "Fault receiver lagged, faults dropped");
                },
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}
