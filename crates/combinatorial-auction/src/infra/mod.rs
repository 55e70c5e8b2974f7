pub mod config;
pub mod observe;
pub mod solver;
