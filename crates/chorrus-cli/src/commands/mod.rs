pub mod auth;
pub mod chores;
pub mod household;
pub mod server;
