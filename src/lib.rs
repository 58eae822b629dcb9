//! jukebox-remote library
//!
//! Keeps a terminal view of a shared jukebox in sync with its server by
//! polling full snapshots, and sends playback commands that race with other
//! clients.

pub mod core;
pub mod error;
pub mod storage;
pub mod types;
pub mod ui;
pub mod utils;
