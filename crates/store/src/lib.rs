//! Document-store layer for the Hawala engine.
//!
//! This crate provides:
//!
//! - The [`DocumentStore`] port trait: point reads, indexed queries, and the
//!   atomic conditional multi-path commit every mutating operation relies on
//! - An in-memory adapter ([`MemoryStore`]) for tests and embedding
//! - Repositories and services that execute `hawala-core` plans as single
//!   atomic batches: account registry, journal ledger, reconciliation
//!   protocol, period closing, and the SMS ingestion pipeline

pub mod catalog;
pub mod document;
pub mod engine;
pub mod memory;
pub mod paths;
pub mod repositories;

pub use document::{DocPath, Document, DocumentStore, Precondition, Revision, StoreError, WriteBatch};
pub use engine::Engine;
pub use memory::MemoryStore;
