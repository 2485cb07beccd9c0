pub mod audio;
pub mod config;
pub mod db;
pub mod http;
pub mod middleware;
pub mod repositories;
pub mod storage;
