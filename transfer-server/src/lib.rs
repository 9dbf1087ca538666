//! Loyalty point transfer-path server.
//!
//! Answers: "my points sit in one loyalty program — through which chain
//! of transfers do they reach a program that can book this award
//! itinerary, on what terms, and how many points move at each step?"

pub mod bookability;
pub mod cache;
pub mod domain;
pub mod planner;
pub mod programs;
pub mod store;
pub mod web;
