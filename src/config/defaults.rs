/// Newest config layout this build understands
pub const CONFIG_VERSION: u32 = 1;

pub fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Terminal columns below which the board switches to the tabbed layout
pub fn default_mobile_breakpoint() -> u16 {
    100
}

pub fn default_tick_ms() -> u64 {
    100
}

pub fn default_true() -> bool {
    true
}
