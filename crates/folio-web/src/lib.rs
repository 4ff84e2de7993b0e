#![forbid(unsafe_code)]

//! Browser host for the folio interaction engine.
//!
//! Walks the document once, feeds DOM events into a
//! [`folio_core::Session`], applies the returned commands and keeps a
//! single `setTimeout` armed for the session's next deadline. Also publishes
//! `window.portfolioUtils`.
//!
//! Only the markup contract, logging setup and error type compile natively;
//! the DOM glue is `wasm32`-only.

pub mod error;
pub mod logging;
pub mod markup;

pub use error::WebError;

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{dispose, start};
