pub mod forecast;
pub mod import;
pub mod plan;
pub mod setup;
pub mod tax;
pub mod ui;
