//! Core domain types and traits for buildmatrix.
//!
//! This crate contains:
//! - Gem references and toolchain selection
//! - Build descriptors
//! - The build registrar trait and in-process registrars

pub mod descriptor;
pub mod error;
pub mod gem;
pub mod registrar;
pub mod toolchain;

pub use descriptor::{BuildDescriptor, ModuleBuild};
pub use error::{Error, Result};
pub use gem::{GemRef, GemSource};
pub use registrar::{BuildRegistrar, MemoryRegistrar, ResolvingRegistrar};
pub use toolchain::Toolchain;
