pub mod api;
pub mod inference;
pub mod state;
pub mod transcript;
