//! Core business logic abstractions

pub mod asset;
pub mod config;
pub mod log;
pub mod price;
pub mod request;
pub mod simulation;

// Re-export main types for cleaner imports
pub use asset::Asset;
pub use price::{FetchError, PriceHistoryProvider, PricePoint, PriceSeries};
pub use request::{Horizon, RequestError, SimulationRequest};
pub use simulation::{
    DateAxis, SimulationError, SimulationInput, SimulationResult, simulate, simulate_with_axis,
};
