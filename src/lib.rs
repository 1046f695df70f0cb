//! Newsroom - content management backend for news articles.
//!
//! This crate implements the domain-event backbone of the system: a
//! transactional outbox with commit-time dispatch to in-process handlers
//! and background at-least-once publishing to external brokers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
