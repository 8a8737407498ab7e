#![warn(missing_docs)]
//! resale-watch watches a ticketing site for resale tickets of one event and
//! notifies chat, email and SMS subscribers when they appear.

pub mod cmd;
pub mod commands;
pub mod config;
pub mod evaluator;
pub mod fetch;
pub mod http_client;
pub mod models;
pub mod notification;
pub mod persistence;
pub mod supervisor;
pub mod telegram;
pub mod test_helpers;
