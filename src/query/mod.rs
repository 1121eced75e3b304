//! Search and category parameters, debounced into committed queries.

mod debounce;
mod params;
mod sync;

pub use debounce::Debouncer;
pub use params::QueryParams;
pub use sync::QuerySync;
