//! Typeforge Core Types and Definitions
//!
//! This crate provides the semantic model consumed by the Typeforge analysis
//! and code generation crates. It includes:
//!
//! - **Identifiers**: String-interned names ([`identifier::Id`])
//! - **Model**: The tree-shaped data model handed over by a parser
//!   ([`model::Model`]), with integer handles for resolved type references
//!   ([`model::TypeId`], [`model::BasicId`])
//!
//! The model derives `serde::Deserialize`, so an already-parsed model can be
//! supplied as a TOML (or any other serde-supported) document.

pub mod identifier;
pub mod model;
