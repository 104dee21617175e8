pub mod add;
pub mod browse;
pub mod config;
pub mod del;
pub mod edit;
pub mod init;
pub mod list;
pub mod log;
pub mod serve;
pub mod show;
pub mod status;
