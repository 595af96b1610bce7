//! Pure simulation logic for the incursion maze.
//!
//! This crate contains all game logic that is independent of any renderer,
//! audio, or UI. Functions take plain data and return results, making them
//! unit-testable and usable from native tools and any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`clock`] | Frame clock with a clamped delta |
//! | [`collision`] | `Collider` trait, grid and box backends, wall-sliding |
//! | [`config`] | Level config, feature counts, numeric tuning |
//! | [`constants`] | Tile codes, world units, event tags, default counts |
//! | [`error`] | Level generation errors |
//! | [`events`] | Game events and their wire tags |
//! | [`grid`] | Tile grid storage and queries |
//! | [`interaction`] | Forward-ray interaction probe and prompts |
//! | [`level`] | Seeded level generation (maze + features) |
//! | [`maze`] | Recursive-backtracker carving with loop injection |
//! | [`movement`] | Player movement, stamina, eye height |
//! | [`placement`] | Rejection-sampled feature placement |
//! | [`pose`] | World poses and grid ↔ world conversion |
//! | [`pursuit`] | Adversary pursue/idle state machine |
//! | [`room`] | Hub room layout and actions |
//! | [`session`] | A full run, advanced tick by tick |
//! | [`stats`] | Player stats, partial updates, HUD condition |
//! | [`validation`] | Level validation (shape, features, connectivity) |

pub mod clock;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod grid;
pub mod interaction;
pub mod level;
pub mod maze;
pub mod movement;
pub mod placement;
pub mod pose;
pub mod pursuit;
pub mod room;
pub mod session;
pub mod stats;
pub mod validation;

pub use error::LevelError;
pub use session::{Incursion, TickInput, TickReport};
