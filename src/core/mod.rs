//! Core business logic: entities, planners and the storage abstraction

pub mod allocation;
pub mod config;
pub mod log;
pub mod model;
pub mod normalize;
pub mod projection;
pub mod repository;
pub mod store;
pub mod tax;

// Re-export main types for cleaner imports
pub use allocation::{AllocationPlan, AllocationResult, Contribution, allocate};
pub use model::{Account, AccountStatus, Goal, Opportunity, OpportunityCategory, Priority, Transaction};
pub use projection::{ForecastProvider, ProjectionPoint, build_projection};
pub use repository::Repository;
pub use store::Store;
pub use tax::{TaxRates, TaxSummary, summarize, summarize_with_rates};
