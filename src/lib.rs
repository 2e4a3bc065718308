pub mod logging;
pub mod mask;
pub mod settings;
pub mod settings_store;
