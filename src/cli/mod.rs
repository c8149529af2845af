//! Command implementations and terminal presentation

pub mod rates;
pub mod setup;
pub mod ui;
