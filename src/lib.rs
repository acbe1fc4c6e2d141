//! # Nest Report
//!
//! Renders one rotation of nest sightings from SQLite into posts for two
//! messaging surfaces, split into segments that fit each platform's limit.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │  SQLite  │──▶│  project  │──▶│ aggregate │──▶│  render  │──▶│  chunk   │──▶│ dispatch │
//! │  rows    │   │ row→nest  │   │ geo/specs │   │dense/blk │   │ segments │   │ sink+ack │
//! └──────────┘   └───────────┘   └───────────┘   └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! nests init                          # create database
//! nests rotate --date 2019-03-21      # start a new nest shift
//! nests periods                       # list stored rotations
//! nests report --style dense          # long-form post as of today
//! nests report --style blocks --date 2019-03-25
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Typed pipeline failures |
//! | [`models`] | Rows, sightings, geography keys |
//! | [`glyphs`] | Species and restricted-location glyphs |
//! | [`store`] | Read-side store trait (SQLite, in-memory) |
//! | [`project`] | Row projection |
//! | [`aggregate`] | Grouped views and species summary |
//! | [`period`] | Rotation lookup with fallback |
//! | [`render`] | Dense and blocks renderers |
//! | [`chunk`] | Size-bounded segment packing |
//! | [`dispatch`] | Segment delivery loop |
//! | [`report`] | End-to-end `report` command |
//! | [`rotate`] | New rotations seeded with permanent nests |
//! | [`periods`] | Rotation listing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod aggregate;
pub mod chunk;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod glyphs;
pub mod migrate;
pub mod models;
pub mod period;
pub mod periods;
pub mod project;
pub mod render;
pub mod report;
pub mod rotate;
pub mod store;
