#![forbid(unsafe_code)]
//! StageTree — a live, foldable view of a git working tree's file status.

pub mod app;
pub mod cli;
pub mod event_loop;
pub mod filetree;
pub mod git;
pub mod logging;
pub mod render;
pub mod terminal;
pub mod watcher;
