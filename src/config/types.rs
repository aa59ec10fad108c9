use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Config layout version; only `1` exists so far
    #[serde(default = "default_version")]
    pub version: u32,

    /// Width (terminal columns) under which only one column is shown at a time
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u16,

    /// Append applied mutations to this file as JSON lines
    #[serde(default)]
    pub journal: Option<PathBuf>,

    /// Capture mouse events for drag and drop
    #[serde(default = "default_true")]
    pub mouse: bool,

    /// Event poll interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}
