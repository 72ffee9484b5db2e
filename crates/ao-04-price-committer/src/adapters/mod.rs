//! Adapters for the price store port

pub mod memory;

pub use memory::InMemoryPriceStore;
