//! Configuration: config file plus command-line overrides

mod config;

pub use config::{ClusterScope, Config, ToolPaths, CONFIG_DIR_ENV, DEFAULT_PORT_SEARCH_START};
