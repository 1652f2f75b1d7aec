pub mod batch;
pub mod build;
pub mod clean;
pub mod watch;
