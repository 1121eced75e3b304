mod intent;
mod reducer;
mod state;

pub use intent::EmployeeModalIntent;
pub use reducer::EmployeeModalReducer;
pub use state::{EmployeeForm, EmployeeModalState, FormField};
