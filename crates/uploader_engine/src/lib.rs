//! Uploader engine: HTTP status source, result page discovery, poll
//! driver and form persistence.
mod autosave;
mod fetch;
mod page;
mod poller;
mod store;
mod types;

pub use autosave::{
    clear_saved_form, load_snapshot, restore_form, save_snapshot, Autosave,
    AUTOSAVE_QUIET_PERIOD, FORM_STORAGE_KEY,
};
pub use fetch::{FetchSettings, FetchedBody, HttpFetcher, ReqwestStatusSource, StatusSource};
pub use page::{decode_page, discover_session, session_id_from_html, DecodeError, PageError};
pub use poller::{PollReport, Poller, RenderSink};
pub use store::{ensure_storage_dir, store_filename, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use types::{FailureKind, FetchError};
