// Positions store: CRUD over job positions, backed by the HR API or by an
// in-process list. The org chart reads its snapshot from here.

pub mod handlers;
pub mod store;
pub mod validation;

pub use store::{InMemoryPositionStore, PositionStore, RemotePositionStore};
