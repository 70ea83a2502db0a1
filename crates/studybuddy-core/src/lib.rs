//! studybuddy-core: Study model, term extraction, and quiz generation.
//!
//! This crate defines the data model, the model-backend traits, and the
//! stages that turn a block of study material into a quiz and a sample of
//! term associations.

pub mod console;
pub mod engine;
pub mod entities;
pub mod error;
pub mod graph;
pub mod model;
pub mod question;
pub mod quiz;
pub mod settings;
pub mod traits;
