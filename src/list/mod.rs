//! Client-visible lists with speculative and confirmed removal.

mod controller;
mod intent;
mod reducer;
mod state;

pub use controller::{Deleter, ListController, ListEvent};
pub use intent::ListIntent;
pub use reducer::ListReducer;
pub use state::{DeletePolicy, ListPhase, ListState};
