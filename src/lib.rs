//! Inbox triage — autonomous email-triage agent core.

pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod gateways;
pub mod ingress;
pub mod pipeline;
pub mod poller;
pub mod providers;
