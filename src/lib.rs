#![forbid(unsafe_code)]

pub mod app;
pub mod assemble;
pub mod chapters;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod formats;
pub mod language;
pub mod locks;
pub mod logging;
pub mod messages;
pub mod pipeline;
pub mod publish;
pub mod template;
pub mod workspace;
