pub mod config;
pub mod logging;

pub mod api;
pub mod catalog;
pub mod integrity;
pub mod naming;
pub mod push;
pub mod save;
pub mod session;
pub mod transfer;
