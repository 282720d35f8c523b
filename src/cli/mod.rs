pub mod chart;
pub mod setup;
pub mod simulate;
pub mod ui;
