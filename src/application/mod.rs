//! Application layer: the caching gateway, session state, the view
//! controller, and the chart presenter.

pub mod controller;
pub mod presenter;
pub mod services;
