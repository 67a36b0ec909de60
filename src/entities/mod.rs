//! Sea-ORM entities. Each `Model` doubles as the resource's wire shape.

pub mod category;
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;

pub use category::Model as Category;
pub use customer::Model as Customer;
pub use order::Model as Order;
pub use order_item::Model as OrderItem;
pub use product::Model as Product;
