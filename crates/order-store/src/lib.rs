pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod query;
pub mod store;

pub use common::{CategoryId, OrderId, OrderStatus, UserId};
pub use error::{Operation, Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use order::{NewOrder, Order, OrderChanges};
pub use postgres::PostgresOrderStore;
pub use query::OrderFilter;
pub use store::OrderStore;
