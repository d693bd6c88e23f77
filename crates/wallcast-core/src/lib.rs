//! `wallcast-core` — shared types, config, and errors for the wallcast
//! workspace.
//!
//! Everything that crosses a crate boundary lives here: the [`types::Record`]
//! wire shape, the [`types::RecordEvent`] change notifications, and the
//! [`config::WallConfig`] loaded from `wallcast.toml` + `WALLCAST_*` env vars.

pub mod config;
pub mod error;
pub mod types;

pub use config::WallConfig;
pub use error::{Result, WallError};
pub use types::{Attachment, Author, ContentKind, Record, RecordEvent, RecordId};
