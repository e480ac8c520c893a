//! Route handlers organized by resource

pub mod health;
pub mod investments;
pub mod selections;
pub mod startups;
