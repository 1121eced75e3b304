/// Marker for anything a reducer reacts to: key presses, settled requests,
/// fresh fetches.
pub trait Intent: Send + 'static {}
