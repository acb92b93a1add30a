pub mod seed;
pub mod server;
