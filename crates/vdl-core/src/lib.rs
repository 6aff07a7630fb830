pub mod config;
pub mod logging;

pub mod cancel;
pub mod error;
pub mod extractor;
pub mod job;
pub mod resolution;
pub mod select;
pub mod storage;
pub mod transfer;
pub mod url_model;
