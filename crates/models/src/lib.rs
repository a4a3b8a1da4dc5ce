//! SeaORM entities for the car service domain plus the small validation
//! helpers that belong to the data itself.

pub mod errors;
pub mod db;
pub mod money;
pub mod user;
pub mod mechanic;
pub mod car;
pub mod service;
pub mod document;
pub mod appointment;

#[cfg(test)]
mod tests;
