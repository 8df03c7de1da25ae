// mixline/src/model/mod.rs

//! Order, audit event and transition-request shapes. Serde field and variant
//! names here are the wire contract shared with existing consumers.

pub mod event;
pub mod order;
pub mod request;

pub use event::{AuditAction, StatusEvent};
pub use order::{Category, Order, OrderStatus, OrderType, PoType, TransactionId};
pub use request::{Role, SuppliedInputs, TransitionRequest};
