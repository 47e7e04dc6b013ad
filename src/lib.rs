//! # yen-to-euro
//!
//! Finds Japanese Yen amounts in the rendered text of a web page and annotates
//! them in place with an approximate Euro equivalent, keeping the annotations
//! current while the page changes.
//!
//! ## Features
//!
//! - **Fragment-aware detection**: a `¥` and its number may sit in different
//!   text nodes or elements (`<span>¥</span><b>1,200</b>`); the search widens
//!   sideways and upwards until the amount is recovered or ruled out
//! - **Idempotent passes**: handled elements are marked, so re-running on
//!   clicks and DOM mutations never annotates twice
//! - **Daily rate cache**: the Yen-to-Euro rate is fetched once per day and
//!   falls back to a fixed default when anything goes wrong
//! - **Live pages**: driven over the Chrome DevTools Protocol (CDP)
//!
//! ## Running
//!
//! ```bash
//! # Annotate a page and keep following clicks/mutations for a minute
//! cargo run -- watch https://example.jp --duration-secs 60
//!
//! # Convert a saved DOM snapshot offline
//! cargo run -- convert snapshot.json --rate 0.0058
//! ```
//!
//! ## Library Usage
//!
//! ```rust
//! use yen_to_euro::{ConversionContext, Converter, Document, RateSource};
//!
//! # fn main() -> yen_to_euro::Result<()> {
//! let mut doc = Document::new("body");
//! let root = doc.root();
//! let p = doc.append_element(root, "p");
//! let price = doc.append_text(p, "¥1,234");
//!
//! let converter = Converter::new(ConversionContext::new(0.00577, RateSource::Override)?);
//! converter.run_pass(&mut doc);
//!
//! assert_eq!(doc.text(price), Some("(7,12\u{a0}€) ¥1,234"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: document model, text node enumeration, the sideways-and-up walker and the marker
//! - [`currency`]: token matching, amount parsing and Euro formatting
//! - [`converter`]: one scan-and-annotate pass over a document
//! - [`orchestrator`]: trigger queue and the [`Page`] abstraction
//! - [`rate`]: rate provider, cache store and fallback resolution
//! - [`browser`]: Chrome session and live page binding
//! - [`config`]: converter settings
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod config;
pub mod converter;
pub mod currency;
pub mod dom;
pub mod error;
pub mod orchestrator;
pub mod rate;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, LivePage};
pub use config::ConverterConfig;
pub use converter::{Converter, PassReport};
pub use currency::{ConversionContext, RateSource};
pub use dom::{Document, NodeId};
pub use error::{ConverterError, Result};
pub use orchestrator::{DocumentPage, Orchestrator, Page, Trigger};
pub use rate::{RateProvider, RateResolver};
