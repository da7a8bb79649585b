pub mod cart;
pub mod favorites;
pub mod files;
pub mod products;
pub mod session;
