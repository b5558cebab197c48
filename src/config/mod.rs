pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{build_router, load_route_table, load_route_table_unchecked};
pub use models::*;
pub use validation::{RouteTableValidator, ValidationError, ValidationResult};
