//! Client-side state synchronization and resource lifecycle engine.
//!
//! [`Dashboard`] owns the mirror of server state, the selection, the
//! terminal resource cache and the retained view model. It performs no I/O.

pub mod command;
pub mod config;
pub mod create_form;
pub mod dashboard;
pub mod diff;
pub mod mirror;
mod reconcile;
pub mod resources;
pub mod status;
pub mod tabs;
pub mod usage;
pub mod view;

pub use command::{Command, Mutation};
pub use config::DashboardConfig;
pub use dashboard::{Connection, Dashboard, Flash, FlashLevel, Msg};
pub use mirror::{Mirror, StatusPatch};
pub use resources::{ResourceCache, ScrollDirection, TerminalBridge, TerminalHandle};
