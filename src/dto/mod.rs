pub mod auth;
pub mod cart;
pub mod contact;
pub mod news;
pub mod orders;
pub mod products;
pub mod quotes;
