//! # CLI Behavior
//!
//! This is **one possible UI client** for attacher, not the application
//! itself. For the overall architecture, see the `attacher` crate docs.
//!
//! ## Commands
//!
//! - `attach engines`: registered engine types, the configured default marked
//! - `attach modes`: attachment modes, curve-parametrized ones marked
//! - `attach init <doc>`: write a sample document
//! - `attach show <doc>`: load a document (migrating legacy attributes) and
//!   print its attachment
//! - `attach set <doc> [edits] [--write]`: apply edits through the
//!   controller, print the result, optionally save
//! - `attach config`: effective configuration, or a template with `--template`
//!
//! A failed attachment is not a command failure: `show` and `set` print the
//! error status the controller put on the object and exit successfully. An
//! edit the controller rejects (an unknown engine type, for instance) exits
//! with an error.
//!
//! ## Module Structure
//!
//! - `commands`: logging, configuration and per-command handlers
//! - `render`: output formatting
//! - `setup`: argument parsing via clap
//! - `styles`: terminal styling constants

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
