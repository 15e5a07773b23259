//! Configuration management for screennav.
//!
//! Settings ([`settings::NavConfig`]) are stored as a TOML file and loaded
//! at startup. Every field has a default, so a missing section is fine.

pub mod settings;
