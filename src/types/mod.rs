pub mod activity;
pub mod block;
pub mod chainage;
pub mod config;
pub mod daily;
pub mod lenient;
pub mod reason;
pub mod report;
pub mod scoring;
pub mod summary;
