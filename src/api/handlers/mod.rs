pub mod addresses;
pub mod authenticate;
pub mod carts;
pub mod catalog;
pub mod credentials;
pub mod favourites;
pub mod health;
pub mod orders;
pub mod payments;
mod proxy;
pub mod shippings;
pub mod users;
pub mod verification_tokens;
