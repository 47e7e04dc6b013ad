//! Chrome session management and the live-page binding

pub mod config;
pub mod page;
pub mod session;
pub mod storage;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::LivePage;
pub use session::{BrowserSession, normalize_url};
pub use storage::LocalStorageStore;
