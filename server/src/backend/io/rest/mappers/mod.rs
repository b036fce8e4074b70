pub mod booking_mapper;
