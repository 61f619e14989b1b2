//! glossa: terminal bilingual dictionary manager
//!
//! Layers, inner to outer:
//! - [`domain`]: collection, dictionaries and translations (no I/O)
//! - [`application`]: the dictionary store service (snapshot load/save, export)
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: arguments, commands and the interactive menu shell

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
