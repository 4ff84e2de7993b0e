#![forbid(unsafe_code)]

//! Core: host-agnostic interaction engine for the folio portfolio page.
//!
//! # Role
//! `folio-core` holds every interaction rule of the page (scroll spy,
//! smooth in-page navigation, card hover emphasis, accessibility
//! affordances, reveal animations, deferred images) as plain Rust state
//! machines. It never touches a DOM: the host reports the page structure
//! once as a [`outline::PageOutline`], feeds browser signals as
//! [`event::HostEvent`]s, and applies the [`command::DomCommand`]s it gets
//! back.
//!
//! # Design goals
//! - **Host-driven time**: the host passes a monotonic timestamp with each
//!   call; all delays live in a keyed [`timer::TimerQueue`].
//! - **Live geometry**: layout is read through [`outline::LayoutProbe`] at
//!   evaluation time, never cached.
//! - **Silent degradation**: missing elements disable their feature; no
//!   interaction path returns an error.
//!
//! `folio-web` wraps [`session::Session`] for `wasm32` browsers.

pub mod a11y;
pub mod command;
pub mod config;
pub mod event;
pub mod hover;
pub mod outline;
pub mod reveal;
pub mod scroll_spy;
pub mod session;
pub mod smooth_scroll;
pub mod spotlight;
pub mod timer;
pub mod viewport;

pub use command::{Dispatch, DomCommand, ScrollBehavior};
pub use config::{ConfigError, InteractionConfig};
pub use event::{HostEvent, Key};
pub use outline::{
    AnchorInfo, AnchorTarget, CardGroup, CardGroupInfo, LayoutProbe, NavLinkInfo, PageOutline,
    Platform, SectionBounds, SectionInfo,
};
pub use session::Session;
pub use viewport::{Viewport, ViewportClass};
