#![doc = include_str!("../README.md")]
//! # Crate features
#![doc = document_features::document_features!()]

#[macro_use]
pub mod utils;

pub mod car_brake;
pub mod consist;
pub mod error;
pub mod imports;
pub mod pneumatics;
pub mod prelude;
pub mod si;
pub mod traits;
pub mod uc;
