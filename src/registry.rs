//! One tree of economic profiles plus the rules for its entity kind.

use std::path::Path;

use tracing::{debug, warn};

use crate::codec::{self, Layout};
use crate::error::Result;
use crate::iter::Iter;
use crate::rank::{find_extremal, Scoring};
use crate::record::{validate_name, Profile};
use crate::tree::{AvlTree, DuplicatePolicy, Insertion};

/// Kind of record a registry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    City,
    Country,
}

impl Entity {
    /// Lowercase noun for messages.
    pub fn noun(self) -> &'static str {
        match self {
            Entity::City => "city",
            Entity::Country => "country",
        }
    }
}

/// Configuration for a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// What happens when a name is inserted twice.
    pub duplicates: DuplicatePolicy,
    /// Criterion used by [`Registry::richest`].
    pub scoring: Scoring,
    /// Snapshot layout.
    pub layout: Layout,
    /// Fractional digits written for money fields; `None` writes exact values.
    pub decimals: Option<usize>,
}

impl Config {
    /// Cities: duplicates are rejected, ranked by net balance, five-line records.
    pub fn city() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            scoring: Scoring::NetBalance,
            layout: Layout::Block,
            decimals: Some(2),
        }
    }

    /// Countries: duplicates overwrite, ranked per capita, one-line records.
    pub fn country() -> Self {
        Self {
            duplicates: DuplicatePolicy::Overwrite,
            scoring: Scoring::PerCapita,
            layout: Layout::Line,
            decimals: Some(2),
        }
    }

    pub fn for_entity(entity: Entity) -> Self {
        match entity {
            Entity::City => Self::city(),
            Entity::Country => Self::country(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::city()
    }
}

/// Named economic profiles kept in an AVL tree.
///
/// ```rust
/// use econ_avl::{Entity, Profile, Registry};
///
/// let mut cities = Registry::new(Entity::City);
/// cities.insert("Lagos", Profile::new(15_000_000, 2.0, 90.0, 70.0)).unwrap();
/// cities.insert("Accra", Profile::new(2_500_000, 1.0, 40.0, 10.0)).unwrap();
///
/// let (name, _) = cities.richest().unwrap();
/// assert_eq!(name, "Accra");
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    tree: AvlTree<Profile>,
    config: Config,
}

impl Registry {
    pub fn new(entity: Entity) -> Self {
        Self::with_config(Config::for_entity(entity))
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            tree: AvlTree::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn tree(&self) -> &AvlTree<Profile> {
        &self.tree
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    fn validate(&self, name: &str, profile: &Profile) -> Result<()> {
        validate_name(name, self.config.layout.allows_whitespace_in_names())?;
        profile.validate(name)
    }

    /// Validate and insert one record under the configured duplicate policy.
    pub fn insert(&mut self, name: &str, profile: Profile) -> Result<Insertion<Profile>> {
        self.validate(name, &profile)?;
        let outcome = self.tree.insert(name, profile, self.config.duplicates);
        match &outcome {
            Insertion::Inserted => debug!(name, len = self.tree.len(), "inserted"),
            Insertion::Updated(_) => debug!(name, "updated"),
            Insertion::Rejected(_) => warn!(name, "duplicate name rejected"),
        }
        Ok(outcome)
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.tree.get(name)
    }

    /// Records in ascending name order.
    pub fn iter(&self) -> Iter<'_, Profile> {
        self.tree.iter()
    }

    /// Highest-scoring record under the configured criterion.
    pub fn richest(&self) -> Option<(&str, &Profile)> {
        let scoring = self.config.scoring;
        find_extremal(&self.tree, |p| scoring.score(p))
    }

    pub fn encode(&self) -> Result<String> {
        codec::encode(&self.tree, self.config.layout, self.config.decimals)
    }

    /// Build a registry from snapshot text.
    pub fn decode(text: &str, config: Config) -> Result<Self> {
        let records = codec::decode(text, config.layout)?;
        let mut registry = Self::with_config(config);
        registry.insert_all(records)?;
        Ok(registry)
    }

    pub fn write_snapshot(&self, path: &Path) -> Result<usize> {
        codec::write_snapshot(path, &self.tree, self.config.layout, self.config.decimals)
    }

    /// Read a snapshot into a fresh registry.
    pub fn load(path: &Path, config: Config) -> Result<Self> {
        let records = codec::read_snapshot(path, config.layout)?;
        let mut registry = Self::with_config(config);
        registry.insert_all(records)?;
        Ok(registry)
    }

    /// Insert every record of a snapshot into this registry.
    ///
    /// Returns how many new names were added. On error the registry is left
    /// exactly as it was.
    pub fn merge_snapshot(&mut self, path: &Path) -> Result<usize> {
        let records = codec::read_snapshot(path, self.config.layout)?;
        for (name, profile) in &records {
            self.validate(name, profile)?;
        }
        let before = self.len();
        self.insert_all(records)?;
        Ok(self.len() - before)
    }

    fn insert_all(&mut self, records: Vec<(String, Profile)>) -> Result<()> {
        for (name, profile) in records {
            self.insert(&name, profile)?;
        }
        Ok(())
    }

    /// Release every record. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        self.tree.clear()
    }
}
