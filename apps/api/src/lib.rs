//! Skill matching, gap analysis, portfolio scoring and project recommendations.
//!
//! The modules under `skills`, `jobs`, `portfolio` and `recommendations` are the
//! in-process core; `routes` exposes them over a thin JSON adapter.

pub mod config;
pub mod errors;
pub mod jobs;
pub mod models;
pub mod portfolio;
pub mod recommendations;
pub mod routes;
pub mod skills;
pub mod state;
