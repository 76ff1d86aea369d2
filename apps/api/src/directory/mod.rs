//! The page contracts of the directory: landing discovery, keyword search,
//! profile view, and profile setup.

pub mod discovery;
pub mod handlers;
pub mod profile;
pub mod search;
pub mod setup;
