//! Data-driven ability catalogs and their loaders.
//!
//! This crate houses authored combat content and the loaders that turn RON
//! files into a [`catalog::AbilityCatalog`], the `CatalogOracle` the core
//! resolves casts against. File formats name statuses, damage styles, and
//! target filters by string; every name is validated against the core's
//! closed enumerations at load time, so a typo is a [`ContentError`] before
//! the battle starts, never a surprise mid-cast.
//!
//! Content is consumed by host oracles and never appears in battle state.

pub mod catalog;
pub mod error;
pub mod formats;

pub use catalog::AbilityCatalog;
pub use error::ContentError;
pub use formats::{AbilityCatalogFile, AbilitySpec, EffectKindSpec, EffectSpec};
