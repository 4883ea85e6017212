pub mod report;
pub mod setup;
pub mod ui;
pub mod ventures;
