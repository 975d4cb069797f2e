//! "Richest entity" query: full scan keeping the best score.

use crate::record::Profile;
use crate::tree::AvlTree;

/// Ranking criterion for [`find_extremal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    /// `income - spending`.
    NetBalance,
    /// `(income - spending) / population`. NaN when population is 0.
    PerCapita,
}

impl Scoring {
    pub fn score(self, profile: &Profile) -> f64 {
        let net = profile.economy.net_balance();
        match self {
            Scoring::NetBalance => net,
            Scoring::PerCapita if profile.population == 0 => f64::NAN,
            Scoring::PerCapita => net / f64::from(profile.population),
        }
    }
}

/// Return the record with the greatest score, or `None` if there is none.
///
/// Records are visited in ascending key order and only a strictly greater score
/// replaces the running best, so on an exact tie the smallest key wins. Records
/// whose score is NaN are skipped; a tree where every score is NaN yields `None`.
pub fn find_extremal<'a, V>(
    tree: &'a AvlTree<V>,
    mut score: impl FnMut(&V) -> f64,
) -> Option<(&'a str, &'a V)> {
    let mut best: Option<(&'a str, &'a V, f64)> = None;
    for (key, value) in tree.iter() {
        let s = score(value);
        if s.is_nan() {
            continue;
        }
        match best {
            Some((_, _, top)) if s <= top => {}
            _ => best = Some((key, value, s)),
        }
    }
    best.map(|(key, value, _)| (key, value))
}
