//! Core domain types: entities, gateway actions, reporting periods,
//! navigation state, and the durable storage trait.

pub mod action;
pub mod entities;
pub mod navigation;
pub mod period;
pub mod storage;
