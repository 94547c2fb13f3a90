//! Background session writer
//!
//! Serializing and writing `sessions.json` happens on a dedicated thread so
//! the UI thread only pays for a snapshot clone. The thread always writes the
//! newest snapshot it has: requests queued behind it are coalesced, so a
//! burst of edits costs one write. Outcomes flow back over a second channel
//! and are drained by the store on its next save.

use super::store::SessionSnapshot;
use crate::error::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::JoinHandle;

#[derive(Debug)]
pub(crate) struct SessionWriter {
    /// `None` once shut down; dropping the sender ends the worker loop
    requests: Option<Sender<SessionSnapshot>>,
    results: Receiver<Result<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SessionWriter {
    pub(crate) fn spawn() -> Result<Self> {
        let (request_tx, request_rx) = unbounded::<SessionSnapshot>();
        let (result_tx, result_rx) = unbounded();

        let handle = std::thread::Builder::new()
            .name("session-writer".to_string())
            .spawn(move || run(request_rx, result_tx))?;
        tracing::debug!("Session writer thread started");

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            handle: Some(handle),
        })
    }

    /// Queue a snapshot. Returns it back if the worker is gone.
    pub(crate) fn submit(
        &self,
        snapshot: SessionSnapshot,
    ) -> std::result::Result<(), SessionSnapshot> {
        match &self.requests {
            Some(tx) => tx.send(snapshot).map_err(|e| e.into_inner()),
            None => Err(snapshot),
        }
    }

    /// Outcomes of writes finished since the last call.
    pub(crate) fn finished(&self) -> Vec<Result<()>> {
        self.results.try_iter().collect()
    }

    /// Let the worker finish what is queued, then stop it.
    pub(crate) fn shutdown(&mut self) {
        self.requests = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Session writer thread panicked");
            } else {
                tracing::debug!("Session writer thread stopped");
            }
        }
    }
}

impl Drop for SessionWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(requests: Receiver<SessionSnapshot>, results: Sender<Result<()>>) {
    while let Ok(mut snapshot) = requests.recv() {
        let mut skipped = 0usize;
        while let Ok(newer) = requests.try_recv() {
            snapshot = newer;
            skipped += 1;
        }
        if skipped > 0 {
            tracing::trace!(skipped, "Coalesced session snapshots");
        }

        if results.send(snapshot.write()).is_err() {
            break;
        }
    }
}
