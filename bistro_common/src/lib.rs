//! Types and helpers shared by the Bistro engine, gateway client and server crates.
mod minor_units;

pub mod helpers;
mod secret;

pub use minor_units::{AmountError, MinorUnits, MINOR_UNITS_PER_MAJOR};
pub use secret::Secret;
