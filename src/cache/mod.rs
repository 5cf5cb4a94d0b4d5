pub mod cache_manager;
pub mod clock;
