//! `wallcast-client` — HTTP access to the record store.
//!
//! # Overview
//!
//! Three pieces:
//!
//! - [`kinto::KintoClient`] fetches the initial record batch and incremental
//!   changesets from a Kinto-style collection endpoint.
//! - [`poller::ChangePoller`] drives `_since` polling in the background and
//!   emits [`wallcast_core::RecordEvent`]s on an mpsc channel, in arrival
//!   order.
//! - [`preload::MediaCache`] prefetches upcoming media bytes, best effort.

pub mod error;
pub mod kinto;
pub mod poller;
pub mod preload;

pub use error::ClientError;
pub use kinto::{ChangeSet, KintoClient};
pub use poller::ChangePoller;
pub use preload::MediaCache;
