//! HTTP middleware
//!
//! Session resolution and the auth gate live in `auth::session`; this module
//! holds the response-side layers.

pub mod security_headers;

pub use security_headers::security_headers_middleware;
