//! `wallcast-slideshow` — the rotation scheduler.
//!
//! # Overview
//!
//! Split in two layers:
//!
//! - [`state::SlideshowState`] is the pure state machine: the content list,
//!   the display queue, and the current record, with one transition per
//!   external event and one for the timer tick. No I/O, fully unit-testable.
//! - [`runner::Slideshow`] drives the state machine from a Tokio loop:
//!   rotation timer, incoming [`wallcast_core::RecordEvent`]s, and a watch
//!   shutdown handle.
//!
//! Rendering and media prefetch are injected through the [`Renderer`] and
//! [`Preloader`] seams.

pub mod renderer;
pub mod runner;
pub mod state;

pub use renderer::{NoopPreloader, Preloader, RenderError, Renderer};
pub use runner::Slideshow;
pub use state::SlideshowState;
