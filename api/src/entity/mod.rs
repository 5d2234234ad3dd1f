//! SeaORM entities
//!
//! Table mappings used by the SQL adapters. Domain code never sees these
//! types directly; adapters convert them into domain entities.

pub mod content;
