pub mod carts;
pub mod news;
pub mod products;
pub mod quote_orders;
pub mod users;

pub use carts::Entity as Carts;
pub use news::Entity as News;
pub use products::Entity as Products;
pub use quote_orders::Entity as QuoteOrders;
pub use users::Entity as Users;
