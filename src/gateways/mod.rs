//! Thin adapters translating core requests into collaborator calls.

pub mod reply;
pub mod scheduling;

pub use reply::ReplyGateway;
pub use scheduling::SchedulingGateway;
