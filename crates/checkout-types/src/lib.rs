//! checkout-types: domain model and ports shared by every checkout crate.

pub mod domain;
pub mod ports;
