//! prism-service: matches developer skills to open-source repositories and
//! asks a language model how to start contributing.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
pub mod utils;
