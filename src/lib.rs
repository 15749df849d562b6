pub mod config;
pub mod io;
pub mod qa;
pub mod rate_error;
pub mod report;
pub mod services;
pub mod utils;
