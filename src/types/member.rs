//! Member and group types for the Vaquita ledger
//!
//! A group is the closed set of members sharing one expense pool. Members are
//! opaque identifiers; the only thing the ledger relies on is their ordering,
//! which breaks ties deterministically when planning settlements.

use super::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Member identifier
///
/// Opaque and unique within a group. Ordered lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create a member identifier from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        MemberId(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        MemberId::new(id)
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        MemberId(id)
    }
}

/// A set of members sharing expenses
///
/// Invariant: never empty. Membership is fixed once the group is built; the
/// ledger only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    members: BTreeSet<MemberId>,
}

impl Group {
    /// Build a group from a roster of member ids
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The roster is empty
    /// - The same member id appears twice
    pub fn new<I>(members: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator,
        I::Item: Into<MemberId>,
    {
        let mut set = BTreeSet::new();
        for member in members {
            let member = member.into();
            if set.contains(&member) {
                return Err(LedgerError::duplicate_member(&member));
            }
            set.insert(member);
        }

        if set.is_empty() {
            return Err(LedgerError::EmptyGroup);
        }

        Ok(Group { members: set })
    }

    /// Whether `member` belongs to this group
    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.contains(member)
    }

    /// Members in identifier order
    pub fn members(&self) -> impl Iterator<Item = &MemberId> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a constructed group; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
