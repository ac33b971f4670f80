pub mod error;
pub mod fields;
pub mod filter;
pub mod ports;
pub mod repo;
pub mod service;
