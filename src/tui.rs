//! Ratatui front-end: a menu to configure the table and a table view that
//! plays rounds with bot seats.

pub mod app;
pub mod controller;
mod ui;
