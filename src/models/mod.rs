pub mod config;

pub use config::{AppConfig, ConfigOverrides, DitherSetting, CONFIG_ENV};
