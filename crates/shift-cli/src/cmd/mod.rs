pub mod bot;
pub mod channel_name;
pub mod config;
pub mod parse;
pub mod usage;
