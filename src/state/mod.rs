pub mod app_settings;
pub mod source;
