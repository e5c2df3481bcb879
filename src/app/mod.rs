pub mod adb;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
