pub mod config;
pub mod logging;

pub mod asset_path;
pub mod browser;
pub mod fetch;
pub mod freezer;
pub mod intercept;
pub mod resource;
pub mod storage;
