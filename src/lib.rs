pub mod boss_ai;
pub mod collision;
pub mod compute;
pub mod config;
pub mod demo;
pub mod entities;
pub mod error;
pub mod phase;
pub mod physics;
pub mod render;
