pub mod chat;
pub mod client;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod settings;
pub mod state;

#[cfg(test)]
mod test_support;
