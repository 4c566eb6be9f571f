// Library interface for the Roam client state layer
pub mod api;
pub mod app;
pub mod fixtures;
pub mod logging;
pub mod settings;
pub mod stores;
