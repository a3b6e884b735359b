pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod loader;
pub mod registry;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
