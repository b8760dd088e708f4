pub mod client;
pub mod config;
pub mod pairing;
pub mod recommend;
pub mod roster;
pub mod server;
pub mod session;
pub mod sync;
