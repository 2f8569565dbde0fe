//! Domain models shared by the storefront and the admin back-office.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderLine, OrderRequest};
pub use product::{Badge, NewProduct, Product, ProductPatch};
pub use user::User;
