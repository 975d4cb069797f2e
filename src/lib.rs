//! # econ-avl
//!
//! An in-memory ordered store of city and country economic profiles, kept in
//! an AVL tree so that lookups stay logarithmic and scans stay linear no matter
//! what order names arrive in.
//!
//! The tree itself ([`AvlTree`]) is generic over its payload. [`Registry`] pairs
//! a tree of [`Profile`]s with the rules for one kind of entity: how duplicate
//! names are handled, how the "richest" record is ranked, and which snapshot
//! layout is used.
//!
//! ## Example
//!
//! ```rust
//! use econ_avl::{Entity, Profile, Registry};
//!
//! let mut countries = Registry::new(Entity::Country);
//! countries.insert("Norway", Profile::new(5_500_000, 10.0, 300.0, 250.0)).unwrap();
//! countries.insert("Chile", Profile::new(19_000_000, 5.0, 90.0, 80.0)).unwrap();
//!
//! let text = countries.encode().unwrap();
//! assert_eq!(text, "Chile 19000000 5.00 90.00 80.00\nNorway 5500000 10.00 300.00 250.00\n");
//! assert_eq!(countries.richest().map(|(name, _)| name), Some("Norway"));
//! ```

#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod iter;
pub mod rank;
pub mod record;
pub mod registry;
pub mod tree;

pub use codec::Layout;
pub use error::{Error, InvalidReason, ParseErrorKind, Result};
pub use iter::Iter;
pub use rank::{find_extremal, Scoring};
pub use record::{Economy, Profile, NAME_MAX_LEN};
pub use registry::{Config, Entity, Registry};
pub use tree::{AvlTree, DuplicatePolicy, Insertion};

#[cfg(test)]
mod proptests;
