#![forbid(unsafe_code)]

pub mod batch;
pub mod cli;
pub mod combine;
pub mod config;
pub mod download;
pub mod error;
pub mod formats;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod playlist;
pub mod stage;
