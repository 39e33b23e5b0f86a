//! Callback-id keyed correlation of transport completions.
//!
//! Each pending call owns a oneshot slot keyed by its [`CallbackId`]. The
//! transport's completion resolves exactly that slot, so concurrent calls
//! of the same kind never see each other's results.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::TransportError;
use crate::pool::{CallbackId, Completion};

type Slot<T> = oneshot::Sender<Result<T, TransportError>>;

/// Pending-call map for one kind of transport call (reads, writes, ...).
pub struct Correlator<T> {
    kind: &'static str,
    pending: Mutex<HashMap<CallbackId, Slot<T>>>,
}

impl<T: Send + 'static> Correlator<T> {
    pub fn new(kind: &'static str) -> Arc<Self> {
        Arc::new(Self {
            kind,
            pending: Mutex::new(HashMap::new()),
        })
    }

    /// Claims `id`. Fails if another call with the same id is still waiting.
    pub fn register(self: &Arc<Self>, id: CallbackId) -> Result<Pending<T>, TransportError> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock();
        if let Some(existing) = pending.get(&id) {
            if !existing.is_closed() {
                return Err(TransportError::DuplicateCallback(id));
            }
        }
        pending.insert(id, tx);
        Ok(Pending {
            id,
            rx,
            owner: Arc::clone(self),
        })
    }

    /// Delivers a transport result to the call waiting on `id`.
    pub fn complete(&self, id: CallbackId, result: Result<T, TransportError>) {
        let slot = self.pending.lock().remove(&id);
        match slot {
            Some(tx) => {
                if tx.send(result).is_err() {
                    tracing::debug!(kind = self.kind, callback_id = id, "Waiter gone before completion");
                }
            }
            None => {
                tracing::warn!(kind = self.kind, callback_id = id, "Completion for unknown callback id");
            }
        }
    }

    /// Completion callback handed to the transport.
    pub fn completion(self: &Arc<Self>) -> Completion<T> {
        let correlator = Arc::clone(self);
        Arc::new(move |id, result| correlator.complete(id, result))
    }

    /// Number of calls still waiting.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().len()
    }

    fn release(&self, id: CallbackId) {
        let mut pending = self.pending.lock();
        if pending.get(&id).is_some_and(|tx| tx.is_closed()) {
            pending.remove(&id);
        }
    }
}

/// A registered call waiting for its completion.
///
/// Dropping it (including cancelling [`Pending::wait`]) frees the id.
pub struct Pending<T: Send + 'static> {
    id: CallbackId,
    rx: oneshot::Receiver<Result<T, TransportError>>,
    owner: Arc<Correlator<T>>,
}

impl<T: Send + 'static> Pending<T> {
    pub fn id(&self) -> CallbackId {
        self.id
    }

    pub async fn wait(mut self) -> Result<T, TransportError> {
        match (&mut self.rx).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Abandoned(self.id)),
        }
    }
}

impl<T: Send + 'static> Drop for Pending<T> {
    fn drop(&mut self) {
        self.rx.close();
        self.owner.release(self.id);
    }
}
