pub mod container;
pub mod error;
pub mod item;
pub mod listener;
pub mod property;
