//! Background fetch worker for remote listings.
//!
//! Remote listings run on a dedicated thread so the event loop can keep
//! redrawing a progress indicator and watch for a cancel keypress while
//! rclone works. Tasks go in and responses come back over
//! crossbeam channels.
//!
//! Cancellation is cooperative: the loop sets the task's cancel flag,
//! which makes [run_lsf] kill the rclone process; a response that still
//! arrives for a cancelled or superseded request is discarded by its
//! request id. Only one fetch is ever outstanding per session.

use crate::core::backend::run_lsf;

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// A remote listing request for the fetch worker.
pub struct FetchTask {
    /// Fully-qualified `remote:path` location to list.
    pub spec: String,
    pub request_id: u64,
    pub cancel: Arc<AtomicBool>,
}

/// Worker reply to a [FetchTask].
#[derive(Debug)]
pub enum FetchResponse {
    Completed { lines: Vec<String>, request_id: u64 },
    Failed { error: String, request_id: u64 },
}

/// Owns the fetch worker thread and its channel endpoints.
pub struct Fetcher {
    task_tx: Sender<FetchTask>,
    response_rx: Receiver<FetchResponse>,
}

impl Fetcher {
    /// Spawns the single fetch worker thread.
    pub fn spawn() -> Self {
        let (task_tx, task_rx) = unbounded::<FetchTask>();
        let (res_tx, response_rx) = unbounded::<FetchResponse>();
        start_fetch_worker(task_rx, res_tx);
        Self {
            task_tx,
            response_rx,
        }
    }

    pub fn task_tx(&self) -> &Sender<FetchTask> {
        &self.task_tx
    }

    pub fn response_rx(&self) -> &Receiver<FetchResponse> {
        &self.response_rx
    }
}

fn start_fetch_worker(task_rx: Receiver<FetchTask>, res_tx: Sender<FetchResponse>) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let FetchTask {
                spec,
                request_id,
                cancel,
            } = task;

            let result = run_lsf(&spec, &cancel);

            // A cancelled fetch produces no response at all; the loop
            // has already moved on and would discard it anyway.
            if cancel.load(Ordering::Acquire) {
                continue;
            }

            let response = match result {
                Ok(lines) => FetchResponse::Completed { lines, request_id },
                Err(e) => FetchResponse::Failed {
                    error: e.to_string(),
                    request_id,
                },
            };
            let _ = res_tx.send(response);
        }
    });
}
