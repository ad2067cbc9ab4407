//! Infrastructure: durable storage backends and the HTTP transport.

pub mod http;
pub mod storage;
