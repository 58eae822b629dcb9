//! Sync core: fetch, render, dispatch, poll

pub mod client;
pub mod dispatcher;
pub mod poller;
pub mod refresh;
pub mod render;
pub mod surface;
pub mod time;
