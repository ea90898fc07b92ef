//! # Attach CLI Architecture
//!
//! `attach` is a thin client of the `attacher` library: the CLI lives in
//! `src/cli/`, while this file only invokes `cli::run()` and handles process
//! termination.
//!
//! ## Workspace Structure
//!
//! - `crates/attacher/`: the attachment controller, UI agnostic
//! - `crates/attacher-cli/`: this tool, depends on the `attacher` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/attacher-cli/src/cli/)                   │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Logging, config and dispatch (commands.rs)               │
//! │  - Terminal rendering via console styles (render.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (crates/attacher/src/document.rs)                  │
//! │  - Loads a document and runs the restore flow               │
//! │  - Routes attribute edits through the controller            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the CLI layer returns plain Rust values and never writes
//! to stdout or stderr. Log records go to stderr through `tracing-subscriber`
//! so they never mix with command output.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to each module, integration tests in
//!   `crates/attacher/tests/`.
//! - **CLI**: argument parsing tests in `setup.rs`, rendering tests in
//!   `render.rs`, end-to-end runs of the binary in `tests/cli_e2e.rs`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
