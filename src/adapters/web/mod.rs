//! Web Adapters
//!
//! Implementation of the WebFetcher port used by partner extraction.

mod http_web_fetcher;

pub use http_web_fetcher::{html_to_text, HttpWebFetcher, DEFAULT_FETCH_TIMEOUT};
