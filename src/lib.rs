//! Grade Dashboard - Course grade distribution charts
//!
//! Loads the course grade dataset once, then turns subject and course
//! selections into a grouped count chart and a stacked percentage chart.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod gui;
