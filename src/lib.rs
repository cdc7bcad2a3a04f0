//! Terminal employee roster: a sortable, filterable, paginated table over a
//! REST employee API, with validated create/update/delete flows on top of a
//! small query cache.

pub mod api;
pub mod app;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod event;
pub mod forms;
pub mod logging;
pub mod mutation;
pub mod query;
pub mod table;
pub mod ui;
