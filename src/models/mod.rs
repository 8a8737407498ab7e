//! This module contains the data models for resale-watch.

pub mod event;
pub mod notification;
pub mod payload;
pub mod resale;
pub mod snapshot;
pub mod subscriber;

pub use event::{DetectionConfig, MonitoredEvent};
pub use notification::{Channel, NotificationEvent};
pub use payload::{Payload, PayloadShape};
pub use resale::ResaleResult;
pub use snapshot::{SaleItem, TicketCollectionSnapshot};
pub use subscriber::Subscriber;
