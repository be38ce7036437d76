#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod console;
pub mod directory;
pub mod permissions;
pub mod utils;
