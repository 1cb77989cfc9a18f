pub mod async_task;
pub mod cli;
pub mod command;
pub mod config;
pub mod dump;
pub mod error;
pub mod filter;
pub mod folder_state;
pub mod main_lib;
pub mod navigator;
pub mod open_all;
pub mod render;
pub mod snapshot;
pub mod sort;
pub mod source;
pub mod tree;

pub use error::{AtlasError, Result};
pub use navigator::{NavigatorEvent, NavigatorState};
pub use snapshot::Snapshot;
pub use tree::{Forest, Node, NodeKind};
