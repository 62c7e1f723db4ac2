//! VCL Pick'Em: scrape a schedule page, take one pick per matchup, show live percentages.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod schedule;
pub mod scrape;
pub mod tasks;
pub mod views;
pub mod voting;
