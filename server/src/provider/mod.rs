pub mod change_inbox;
pub mod container_listener;
pub mod data_generators;
pub mod data_provider;
pub mod data_provider_config;
