//! Forecast grid engine for Windsock.
//!
//! Turns each climb's hourly forecast into a padded, scored day/hour grid,
//! links the grids for navigation, resolves alias slugs, and assembles the
//! result into a serializable page model.

pub mod alias;
pub mod climb;
pub mod conditions;
pub mod context;
pub mod day_bucket;
pub mod error;
pub mod grid;
pub mod historical;
pub mod navigation;
pub mod padding;
pub mod scoring;
pub mod site;
pub mod slug;

#[cfg(test)]
mod testing;
