pub mod compute;
pub mod config;
pub mod controls;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod schedule;
pub mod viewport;
