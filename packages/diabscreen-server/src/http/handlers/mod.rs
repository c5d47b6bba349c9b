//! Route handlers, grouped by resource

pub mod admin;
pub mod catalog;
pub mod diagnosis;
pub mod records;
pub mod system;
