// Library root
// -----------
// This crate exposes the pieces of the `coldshard` CLI as a library so
// they can be tested without a terminal. The binary (`main.rs`) wires them
// together.
//
// Module responsibilities:
// - `config`: settings plus the credential file (`CredentialStore`).
// - `api`: authenticated HTTP calls to the panel and status translation.
// - `models`: typed panel payloads.
// - `error`: the `PanelError` taxonomy.
// - `select`: turning an operator's server choice into an identifier.
// - `ui`: dialoguer prompts, spinners and styled output.
// - `commands`: one handler per CLI command, plus rendering.
// - `cli`: the clap command-line definition.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod select;
pub mod ui;

pub use api::PanelClient;
pub use config::{Credential, CredentialStore, Settings};
pub use error::PanelError;
