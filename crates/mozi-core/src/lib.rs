pub mod conflict;
pub mod console;
pub mod digest;
pub mod error;
pub mod install;
pub mod io;
pub mod paths;
pub mod rules;
pub mod store;
pub mod tools;

#[cfg(test)]
mod testing;

pub use error::{MoziError, Result};
