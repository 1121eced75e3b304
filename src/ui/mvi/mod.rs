//! Intent/reducer/state primitives. The dashboard modal and both list
//! controllers change state only by reducing an intent; renderers and
//! callers read snapshots.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
