//! Small helpers shared by the binary and storage

pub mod paths;
