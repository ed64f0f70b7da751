//! Indexed access to the CelebA face attribute dataset.

mod common;
pub mod config;
pub mod dataset;
pub mod error;
pub mod processor;

pub use error::{Error, Result};
