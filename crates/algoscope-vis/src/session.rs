//! One task per visualizer: the only writer of its state.
//!
//! Commands arrive on an mpsc channel with a oneshot reply. Whenever the
//! state changes, the session reconciles its [`OneShotTimer`] with
//! [`Visualizer::pending_timer`] and publishes the new view on a watch
//! channel. Snapshots go to a writer task that stores them on the blocking
//! pool. Dropping every [`SessionHandle`] stops the task, and with it the
//! timer; the view channel closes once the last snapshot is written.

use std::sync::Arc;

use algoscope_store::{KeyValueStore, Visualizer};
use algoscope_utils::OneShotTimer;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

const COMMAND_BUFFER: usize = 32;

struct Request<V: Visualizer> {
    command: V::Command,
    reply: oneshot::Sender<V::View>,
}

/// Client side of a running session.
pub struct SessionHandle<V: Visualizer> {
    tx: mpsc::Sender<Request<V>>,
    view: watch::Receiver<V::View>,
}

impl<V: Visualizer> Clone for SessionHandle<V> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            view: self.view.clone(),
        }
    }
}

impl<V: Visualizer> SessionHandle<V> {
    /// Apply `command` and wait for the resulting view.
    pub async fn request(&self, command: V::Command) -> Result<V::View> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request { command, reply })
            .await
            .map_err(|_| Error::SessionClosed)?;
        rx.await.map_err(|_| Error::SessionClosed)
    }

    /// The latest published view.
    pub fn view(&self) -> V::View {
        self.view.borrow().clone()
    }

    /// Receiver that wakes on every published view.
    pub fn subscribe(&self) -> watch::Receiver<V::View> {
        self.view.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Drop this handle and wait for the session to stop.
    ///
    /// The session stops once every handle is gone, so this returns only
    /// after the other clones are dropped and the last snapshot is stored.
    pub async fn shutdown(self) {
        let Self { tx, mut view } = self;
        drop(tx);
        while view.changed().await.is_ok() {}
    }
}

/// Builder for a session task.
pub struct Session<V: Visualizer> {
    visualizer: V,
    store: Option<Arc<dyn KeyValueStore>>,
    rng: Box<dyn RngCore + Send>,
    snapshots: Option<mpsc::UnboundedSender<Vec<u8>>>,
}

impl<V: Visualizer> Session<V> {
    pub fn new(visualizer: V) -> Self {
        Self {
            visualizer,
            store: None,
            rng: Box::new(StdRng::from_entropy()),
            snapshots: None,
        }
    }

    /// Hydrate from and persist to `store`.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Restore persisted state, then run on the current tokio runtime.
    pub fn spawn(mut self) -> SessionHandle<V> {
        if let Some(store) = &self.store {
            match algoscope_store::restore(&**store, &mut self.visualizer) {
                Ok(true) => info!(key = self.visualizer.storage_key(), "session restored"),
                Ok(false) => debug!(key = self.visualizer.storage_key(), "no saved session"),
                Err(e) => warn!(key = self.visualizer.storage_key(), error = %e, "failed to restore session"),
            }
        }

        let writer = self.store.clone().map(|store| {
            let (snapshots, queued) = mpsc::unbounded_channel();
            self.snapshots = Some(snapshots);
            tokio::spawn(write_snapshots(store, self.visualizer.storage_key(), queued))
        });

        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view) = watch::channel(self.visualizer.view());
        tokio::spawn(self.run(rx, view_tx, writer));
        SessionHandle { tx, view }
    }

    async fn run(
        mut self,
        mut requests: mpsc::Receiver<Request<V>>,
        views: watch::Sender<V::View>,
        writer: Option<JoinHandle<()>>,
    ) {
        let kind = self.visualizer.kind();
        let (mut timer, mut fired) = OneShotTimer::new();
        // A restored Playing state resumes here.
        timer.sync(self.visualizer.pending_timer());
        debug!(%kind, "session started");

        loop {
            tokio::select! {
                request = requests.recv() => {
                    let Some(Request { command, reply }) = request else {
                        break;
                    };
                    debug!(%kind, ?command, "command");
                    self.visualizer.apply(command, self.rng.as_mut());
                    let view = self.settle(&mut timer, &views);
                    // The caller may have given up waiting.
                    let _ = reply.send(view);
                }
                Some(event) = fired.recv() => {
                    if let Some(token) = timer.accept(event) {
                        self.visualizer.fire(token);
                        self.settle(&mut timer, &views);
                    }
                }
            }
        }

        timer.cancel();
        // Closing the queue lets the writer drain and exit.
        self.snapshots = None;
        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                warn!(%kind, error = %e, "snapshot writer failed");
            }
        }
        debug!(%kind, "session stopped");
    }

    fn settle(&mut self, timer: &mut OneShotTimer<V::Token>, views: &watch::Sender<V::View>) -> V::View {
        timer.sync(self.visualizer.pending_timer());

        let view = self.visualizer.view();
        views.send_replace(view.clone());

        if let Some(snapshots) = &self.snapshots {
            match serde_json::to_vec(&self.visualizer.snapshot()) {
                Ok(bytes) => {
                    // The writer outlives this loop.
                    let _ = snapshots.send(bytes);
                }
                Err(e) => {
                    warn!(key = self.visualizer.storage_key(), error = %e, "failed to encode snapshot")
                }
            }
        }
        view
    }
}

/// Store queued snapshots on the blocking pool. Snapshots that queued up
/// behind a slow write are skipped in favour of the newest.
async fn write_snapshots(
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    mut queued: mpsc::UnboundedReceiver<Vec<u8>>,
) {
    while let Some(mut bytes) = queued.recv().await {
        while let Ok(newer) = queued.try_recv() {
            bytes = newer;
        }
        let len = bytes.len();
        let store = store.clone();
        match tokio::task::spawn_blocking(move || store.put(key, &bytes)).await {
            Ok(Ok(())) => debug!(key, bytes = len, "state saved"),
            Ok(Err(e)) => warn!(key, error = %e, "failed to persist session"),
            Err(e) => warn!(key, error = %e, "snapshot write panicked"),
        }
    }
}

/// Spawn a session for `visualizer` with entropy-seeded randomness.
pub fn spawn_session<V: Visualizer>(
    visualizer: V,
    store: Option<Arc<dyn KeyValueStore>>,
) -> SessionHandle<V> {
    let session = Session::new(visualizer);
    match store {
        Some(store) => session.with_store(store).spawn(),
        None => session.spawn(),
    }
}
