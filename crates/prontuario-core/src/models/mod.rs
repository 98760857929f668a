//! Domain models for the clinic records system.

mod appointment;
mod patient;
mod record;

pub use appointment::*;
pub use patient::*;
pub use record::*;
