//! Git CLI wrapper for gitpromote.

pub mod client;

pub use client::GitClient;
