pub mod cart;
pub mod design;
pub mod favorite;
pub mod image;
pub mod setting;
pub mod user;

pub use cart::{Cart, CartItem, CartItemDetail};
pub use design::{Design, DesignStatus};
pub use favorite::UserFavorite;
pub use image::DesignImage;
pub use setting::AppSetting;
pub use user::User;
