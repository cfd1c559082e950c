//! fastcodal: download financial disclosure reports from Codal

pub mod codal;
pub mod config;
pub mod downloader;
pub mod models;
pub mod storage;
