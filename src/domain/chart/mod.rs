//! Chart aggregate: pixel geometry, render guard and display formatting.

pub mod formatting;
pub mod services;
pub mod value_objects;

pub use services::*;
pub use value_objects::*;
