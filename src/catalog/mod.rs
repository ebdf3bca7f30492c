pub mod api_types;
pub mod cache;
pub mod client;
pub mod service;
pub mod types;

#[cfg(test)]
pub mod testing;
