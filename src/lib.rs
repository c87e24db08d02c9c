//! Stockwatch: daily price/news collection, signal analysis and alerting
//! for a small equity watch-list.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod models;
pub mod services;
pub mod signals;
