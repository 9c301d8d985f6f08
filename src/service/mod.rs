//! Service layer: business logic orchestration.
//!
//! [`NotifyService`] accepts notifications from the WebSocket and REST
//! surfaces and emits them through the [`crate::domain::EventBus`].

pub mod notify_service;

pub use notify_service::NotifyService;
