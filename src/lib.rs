//! Batch dispatcher for git commands.
//!
//! `githerd` discovers the git repositories sitting directly under a
//! configured folder and applies one git porcelain command (`fetch`, `push`,
//! `pull`, or a branch switch) to each of them in turn.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod scan;
