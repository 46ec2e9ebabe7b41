pub mod data_generator;
pub mod property_value_generator;
