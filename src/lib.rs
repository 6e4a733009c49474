//! Invoice numbering and totals workflow for a small billing backend.
//!
//! The crate is split hexagonally: `domain` holds the entities, ports and
//! services (totals calculation and invoice number allocation),
//! `application` exposes one use case per file with command/response DTOs,
//! and `infrastructure` provides the Postgres and in-memory persistence
//! adapters plus the Tera artifact renderer and configuration loading.

pub mod application;
pub mod domain;
pub mod infrastructure;
