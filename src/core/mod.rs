pub mod clock;
pub mod config;
pub mod errors;
pub mod grid;
pub mod output;
pub mod registry;
pub mod resource;
pub mod simulation;
pub mod traits;
