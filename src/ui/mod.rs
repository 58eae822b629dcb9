//! Display surfaces, input parsing and pickers

pub mod dialoguer_selector;
pub mod fzf;
pub mod input;
pub mod selector;
pub mod terminal;
