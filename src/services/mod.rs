pub mod admin;
pub mod cart;
pub mod catalog;
pub mod design_number;
pub mod favorites;
pub mod whatsapp;

pub use admin::AdminService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use favorites::FavoritesService;
