/// Marker for reducer state.
///
/// `Default` is the state a reducer starts from and what `std::mem::take`
/// leaves behind while a transition runs.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
