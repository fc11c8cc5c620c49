//! Database query functions organized by domain.

pub mod catalog;
pub mod crystals;
pub mod flash;
pub mod inventory;
pub mod shop;
pub mod social;
pub mod users;
pub mod wallet;
