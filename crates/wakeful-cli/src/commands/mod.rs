pub mod activity;
pub mod apps;
pub mod config;
pub mod run;
pub mod schedule;
pub mod status;
