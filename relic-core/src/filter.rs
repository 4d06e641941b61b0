//! Artifact filter expressions
//!
//! An [`ArtifactFilter`] collects the optional list constraints and turns
//! them into a conjunction of [`Predicate`]s. Absent constraints produce no
//! predicate at all. The same predicate list is evaluated in memory by
//! [`ArtifactFilter::matches`] and rendered to SQL by the Postgres store, so
//! both backends agree on what a filter selects.
//!
//! An artifact whose optional column is absent never satisfies a range
//! predicate on that column, matching SQL `NULL` comparison semantics.

use crate::{Artifact, CreatorId};
use serde::{Deserialize, Serialize};

/// Inclusive bound on an integer column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Bound {
    /// `column >= from`
    AtLeast(i32),
    /// `column <= to`
    AtMost(i32),
    /// `from <= column <= to`; empty when `from > to`.
    Between(i32, i32),
}

impl Bound {
    pub fn contains(&self, value: i32) -> bool {
        match *self {
            Bound::AtLeast(from) => value >= from,
            Bound::AtMost(to) => value <= to,
            Bound::Between(from, to) => from <= value && value <= to,
        }
    }
}

/// Optional `from` / `to` pair as it arrives on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RangeFilter {
    pub from: Option<i32>,
    pub to: Option<i32>,
}

impl RangeFilter {
    pub fn new(from: Option<i32>, to: Option<i32>) -> Self {
        Self { from, to }
    }

    /// `None` when neither end is given.
    pub fn bound(&self) -> Option<Bound> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some(Bound::Between(from, to)),
            (Some(from), None) => Some(Bound::AtLeast(from)),
            (None, Some(to)) => Some(Bound::AtMost(to)),
            (None, None) => None,
        }
    }
}

/// One conjunct of an artifact query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    CreatorIs(CreatorId),
    /// Case-insensitive exact match on `origin`.
    OriginIs(String),
    YearCreated(Bound),
    PowerLevel(Bound),
}

impl Predicate {
    pub fn matches(&self, artifact: &Artifact) -> bool {
        match self {
            Predicate::CreatorIs(id) => artifact.creator_id == *id,
            Predicate::OriginIs(origin) => artifact
                .origin
                .as_deref()
                .is_some_and(|o| o.to_lowercase() == origin.to_lowercase()),
            Predicate::YearCreated(bound) => {
                artifact.year_created.is_some_and(|y| bound.contains(y))
            }
            Predicate::PowerLevel(bound) => {
                artifact.power_level.is_some_and(|p| bound.contains(p))
            }
        }
    }
}

/// Optional constraints for listing and reporting artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactFilter {
    pub creator_id: Option<CreatorId>,
    pub origin: Option<String>,
    pub year: RangeFilter,
    pub power: RangeFilter,
}

impl ArtifactFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_creator(mut self, creator_id: CreatorId) -> Self {
        self.creator_id = Some(creator_id);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_year(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.year = RangeFilter::new(from, to);
        self
    }

    pub fn with_power(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.power = RangeFilter::new(from, to);
        self
    }

    /// The conjunction of every present constraint, in a fixed order.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(4);
        if let Some(id) = self.creator_id {
            predicates.push(Predicate::CreatorIs(id));
        }
        if let Some(origin) = &self.origin {
            predicates.push(Predicate::OriginIs(origin.clone()));
        }
        if let Some(bound) = self.year.bound() {
            predicates.push(Predicate::YearCreated(bound));
        }
        if let Some(bound) = self.power.bound() {
            predicates.push(Predicate::PowerLevel(bound));
        }
        predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    pub fn matches(&self, artifact: &Artifact) -> bool {
        self.predicates().iter().all(|p| p.matches(artifact))
    }
}
