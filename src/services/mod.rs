pub mod cart_service;
pub mod favorite_service;
pub mod file_service;
pub mod listing_service;
pub mod session_service;
