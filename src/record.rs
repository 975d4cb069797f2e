//! Record payload stored per name.

use crate::error::{Error, InvalidReason, Result};

/// Longest accepted name, in bytes.
pub const NAME_MAX_LEN: usize = 49;

/// Budget, income and spending of one city or country.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Economy {
    pub budget: f64,
    pub income: f64,
    pub spending: f64,
}

impl Economy {
    #[inline]
    pub fn net_balance(&self) -> f64 {
        self.income - self.spending
    }

    fn is_finite(&self) -> bool {
        self.budget.is_finite() && self.income.is_finite() && self.spending.is_finite()
    }
}

/// Payload stored under a name: population plus economic strength.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Profile {
    pub population: u32,
    pub economy: Economy,
}

impl Profile {
    pub fn new(population: u32, budget: f64, income: f64, spending: f64) -> Self {
        Self {
            population,
            economy: Economy {
                budget,
                income,
                spending,
            },
        }
    }

    /// Reject NaN or infinite figures; they can neither be ranked nor persisted.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.economy.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidRecord {
                name: name.to_string(),
                reason: InvalidReason::NonFinite,
            })
        }
    }
}

/// Check the key constraints shared by every layout.
///
/// When `allow_whitespace` is false, names containing any whitespace are also
/// refused, since the single-line layout splits fields on whitespace.
pub fn check_name(name: &str, allow_whitespace: bool) -> std::result::Result<(), InvalidReason> {
    if name.is_empty() {
        return Err(InvalidReason::EmptyName);
    }
    if name.len() > NAME_MAX_LEN {
        return Err(InvalidReason::NameTooLong);
    }
    if name.contains(['\n', '\r']) {
        return Err(InvalidReason::LineTerminator);
    }
    if !allow_whitespace && name.contains(char::is_whitespace) {
        return Err(InvalidReason::Whitespace);
    }
    Ok(())
}

/// [`check_name`] lifted into the crate error type.
pub fn validate_name(name: &str, allow_whitespace: bool) -> Result<()> {
    check_name(name, allow_whitespace).map_err(|reason| Error::InvalidRecord {
        name: name.to_string(),
        reason,
    })
}
