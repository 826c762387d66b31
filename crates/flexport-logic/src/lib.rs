//! Pure simulation logic for FlexPort.
//!
//! This crate contains the game logic that is independent of the ECS engine
//! and of any renderer. Functions take plain data and return results, making
//! them unit-testable and reusable from the engine, the headless harness and
//! any future client.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Ship classes, real-world ports, cargo types, rival names |
//! | [`config`] | Game modes and every tunable simulation parameter |
//! | [`economy`] | Efficiency scores, cargo splitting, refunds and upgrades |
//! | [`geo`] | Sphere geometry: lat/lon, arc distance, slerp, headings |
//! | [`navigation`] | Per-tick movement integrator along waypoints |
//! | [`route`] | Great-circle route planning that stays over water |
//! | [`water`] | Pluggable land/water classification |

pub mod catalog;
pub mod config;
pub mod economy;
pub mod geo;
pub mod navigation;
pub mod route;
pub mod water;
