/// Middleware modules for the API server
///
/// - `security`: Security response headers
/// - `staff_auth`: Bearer token check for the back office

pub mod security;
pub mod staff_auth;
