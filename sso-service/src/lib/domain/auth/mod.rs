pub mod errors;
pub mod models;
pub mod ports;
pub mod registrar;
pub mod service;

mod blocking;
