// Repository modules
pub mod booking_repository;

// Re-export repository types
pub use booking_repository::BookingRepository;
