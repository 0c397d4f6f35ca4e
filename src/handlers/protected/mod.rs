pub mod cart;
pub mod designs;
pub mod favorites;
pub mod me;
