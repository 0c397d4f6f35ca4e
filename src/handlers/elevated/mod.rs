pub mod admin;
pub mod designs;
pub mod images;
pub mod upload;
pub mod uploads;
