//! Debounced persistence of form field values.
//!
//! Input events feed an [`Autosave`] task. Once no input arrived for the
//! quiet period, the latest snapshot is written as one JSON object under
//! [`FORM_STORAGE_KEY`]. Storage and parse failures are logged and
//! otherwise ignored: losing a draft never breaks the page.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uploader_core::{FormFields, FormSnapshot};
use uploader_logging::{uploader_debug, uploader_warn, Subsystem};

use crate::{KeyValueStore, StoreError};

pub const FORM_STORAGE_KEY: &str = "vk_uploader_form";
pub const AUTOSAVE_QUIET_PERIOD: Duration = Duration::from_secs(1);

/// Reads the stored snapshot; missing or malformed data is `None`.
pub fn load_snapshot(store: &dyn KeyValueStore) -> Option<FormSnapshot> {
    let raw = match store.get(FORM_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            uploader_warn!(Subsystem::Autosave, "failed to read saved form: {}", err);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            uploader_warn!(Subsystem::Autosave, "discarding malformed saved form: {}", err);
            None
        }
    }
}

/// Page-load restore. Returns the fields that were filled, one per
/// synthetic input event the caller should dispatch.
pub fn restore_form(store: &dyn KeyValueStore, fields: &mut FormFields) -> Vec<String> {
    let Some(snapshot) = load_snapshot(store) else {
        return Vec::new();
    };
    let restored = fields.restore(&snapshot);
    uploader_debug!(Subsystem::Autosave, "restored {} field(s)", restored.len());
    restored
}

pub fn save_snapshot(store: &dyn KeyValueStore, snapshot: &FormSnapshot) -> Result<(), StoreError> {
    let json = serde_json::to_string(snapshot)?;
    store.set(FORM_STORAGE_KEY, &json)
}

pub fn clear_saved_form(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(FORM_STORAGE_KEY)
}

enum Command {
    Input(FormSnapshot),
    Submitted,
}

/// Handle to the background debounce task.
pub struct Autosave {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl Autosave {
    /// Spawns the debounce task on the current tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>, quiet_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, quiet_period, rx));
        Self { tx, task }
    }

    /// An input event with the form's current values. Restarts the quiet period.
    pub fn input(&self, snapshot: FormSnapshot) {
        let _ = self.tx.send(Command::Input(snapshot));
    }

    /// The form was submitted successfully: drop any pending save and
    /// delete the stored draft.
    pub fn submitted(&self) {
        let _ = self.tx.send(Command::Submitted);
    }

    /// Page teardown. A save still waiting for its quiet period is lost.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(err) = self.task.await {
            uploader_warn!(Subsystem::Autosave, "autosave task ended abnormally: {}", err);
        }
    }
}

async fn run(
    store: Arc<dyn KeyValueStore>,
    quiet_period: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut pending: Option<FormSnapshot> = None;

    loop {
        let command = match pending.take() {
            None => match rx.recv().await {
                Some(command) => command,
                None => break,
            },
            Some(snapshot) => {
                tokio::select! {
                    command = rx.recv() => match command {
                        Some(command) => command,
                        None => break,
                    },
                    _ = tokio::time::sleep(quiet_period) => {
                        write(store.as_ref(), &snapshot);
                        continue;
                    }
                }
            }
        };

        match command {
            Command::Input(snapshot) => pending = Some(snapshot),
            Command::Submitted => {
                if let Err(err) = clear_saved_form(store.as_ref()) {
                    uploader_warn!(Subsystem::Autosave, "failed to clear saved form: {}", err);
                }
            }
        }
    }
}

fn write(store: &dyn KeyValueStore, snapshot: &FormSnapshot) {
    match save_snapshot(store, snapshot) {
        Ok(()) => uploader_debug!(Subsystem::Autosave, "saved {} field(s)", snapshot.len()),
        Err(err) => uploader_warn!(Subsystem::Autosave, "failed to save form: {}", err),
    }
}
