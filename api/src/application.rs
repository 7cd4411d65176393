pub mod auth;
pub mod device_middleware;
pub mod http;
