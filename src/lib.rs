pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod scanner;
