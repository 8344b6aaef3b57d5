//! Implementations of the `lean` subcommands

pub mod config;
pub mod init;
pub mod login;
pub mod logout;
