pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod frame;
pub mod frontend;
pub mod session;
