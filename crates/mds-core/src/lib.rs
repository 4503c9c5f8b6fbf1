//! MDS Core
//!
//! This crate provides the document model and error definitions
//! for the MDS step-document parser.
//!
//! # Overview
//!
//! The core crate contains:
//! - [`Document`], [`Step`] - The parse result and its linked steps
//! - [`MetaValue`], [`Metadata`] - Local and global metadata values
//! - [`Node`], [`ComponentNode`], [`ContentTree`] - The markdown content tree
//! - [`Scope`], [`BlockLang`] - Block-header classification enums
//! - [`MdsError`] - Error types
//! - [`Position`] - Source location

pub mod document;
pub mod enums;
pub mod error;
pub mod node;
pub mod types;
pub mod value;

pub use document::{Document, Step, StepIter, DEFAULT_STEP_ID};
pub use enums::{BlockLang, Scope};
pub use error::{MdsError, Result};
pub use node::{Alignment, ComponentNode, ContentTree, Node};
pub use types::Position;
pub use value::{MetaValue, Metadata};
