// Command handlers module
pub mod completions;
pub mod monitor;
pub mod net;
