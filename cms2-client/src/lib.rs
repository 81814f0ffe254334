//! Editor integration shim for the CMS-2 language server.
//!
//! The shim does three things: resolve a small set of configuration values,
//! build a subprocess launch descriptor from them, and hand lifecycle control
//! to a narrow [`launch::LanguageClient`] contract. Protocol framing, the
//! initialization handshake, and document synchronization are the client
//! library's problem; restarting a crashed server is the user's (a crash is
//! surfaced by the host and fixed with a manual reload).

pub mod config;
pub mod launch;
pub mod shim;

pub use config::{load_defaults, ClientConfig, Loader, TraceLevel, BUNDLED_SERVER_PATH};
pub use launch::{ClientError, LanguageClient, LaunchMode, LaunchSpec, StdioClient, Transport};
pub use shim::{activate, ActivationContext, Shim, StatusItem};
