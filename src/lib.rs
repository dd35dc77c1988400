//! MapLedsCraft — pixel-grid planner for in-game block map art.
//!
//! The [`components::tools::Editor`] owns a [`canvas::Canvas`] of cells, routes
//! pointer input to the painting operations in [`ops`], and keeps a live
//! [`inventory::Inventory`] of the blocks each shade requires.

#[macro_use]
pub mod logger;
#[macro_use]
pub mod i18n;

pub mod canvas;
pub mod cli;
pub mod components;
pub mod inventory;
pub mod io;
pub mod ops;
pub mod palette;
pub mod project;
pub mod settings;
