//! Core entity structures
//!
//! `Creator` and `Artifact` mirror the stored rows one to one. The
//! artifact keeps only the foreign key to its creator; joining the creator
//! row in is an explicit step performed by whoever needs it.
//!
//! Drafts are the validated, id-less shapes handed to the store on insert
//! and full-replace update. They can only be built through their
//! constructors, so a draft that exists has passed every field rule.

use crate::error::ValidationError;
use crate::validate::{ValidateMaxChars, ValidateNonEmpty, ValidateRange};
use crate::{ArtifactId, CreatorId};
use serde::{Deserialize, Serialize};

/// Maximum length of `name` for both entities.
pub const MAX_NAME_CHARS: usize = 255;
/// Maximum length of creator `race` / `realm`.
pub const MAX_TEXT_CHARS: usize = 255;
/// Maximum length of artifact `origin`.
pub const MAX_ORIGIN_CHARS: usize = 255;
/// Maximum length of artifact `tags`.
pub const MAX_TAGS_CHARS: usize = 500;
/// Inclusive upper bound of artifact `powerLevel`.
pub const MAX_POWER_LEVEL: i32 = 10_000;

/// Creator - the author of artifacts. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: CreatorId,
    pub name: String,
    pub race: Option<String>,
    pub realm: Option<String>,
}

impl Creator {
    /// Materialize a stored row from a draft and its assigned id.
    pub fn from_draft(id: CreatorId, draft: CreatorDraft) -> Self {
        Self {
            id,
            name: draft.name,
            race: draft.race,
            realm: draft.realm,
        }
    }

    /// Case-insensitive name comparison used for uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Artifact - a named item made by exactly one creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub name: String,
    pub creator_id: CreatorId,
    pub origin: Option<String>,
    pub tags: Option<String>,
    pub year_created: Option<i32>,
    pub power_level: Option<i32>,
}

impl Artifact {
    pub fn from_draft(id: ArtifactId, draft: ArtifactDraft) -> Self {
        Self {
            id,
            name: draft.name,
            creator_id: draft.creator_id,
            origin: draft.origin,
            tags: draft.tags,
            year_created: draft.year_created,
            power_level: draft.power_level,
        }
    }
}

/// Validated creator write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorDraft {
    name: String,
    race: Option<String>,
    realm: Option<String>,
}

impl CreatorDraft {
    pub fn new(
        name: Option<String>,
        race: Option<String>,
        realm: Option<String>,
    ) -> Result<Self, ValidationError> {
        name.validate_non_empty("name")?;
        name.validate_max_chars("name", MAX_NAME_CHARS)?;
        race.validate_max_chars("race", MAX_TEXT_CHARS)?;
        realm.validate_max_chars("realm", MAX_TEXT_CHARS)?;

        Ok(Self {
            name: name.unwrap_or_default(),
            race,
            realm,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn race(&self) -> Option<&str> {
        self.race.as_deref()
    }

    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }
}

/// Validated artifact write. Creator existence is not checked here; that
/// needs the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDraft {
    name: String,
    creator_id: CreatorId,
    origin: Option<String>,
    tags: Option<String>,
    year_created: Option<i32>,
    power_level: Option<i32>,
}

impl ArtifactDraft {
    pub fn new(
        name: Option<String>,
        creator_id: Option<CreatorId>,
        origin: Option<String>,
        tags: Option<String>,
        year_created: Option<i32>,
        power_level: Option<i32>,
    ) -> Result<Self, ValidationError> {
        name.validate_non_empty("name")?;
        name.validate_max_chars("name", MAX_NAME_CHARS)?;
        let creator_id = creator_id.ok_or_else(|| ValidationError::missing("creatorId"))?;
        origin.validate_max_chars("origin", MAX_ORIGIN_CHARS)?;
        tags.validate_max_chars("tags", MAX_TAGS_CHARS)?;
        year_created.validate_non_negative("yearCreated")?;
        power_level.validate_range("powerLevel", 0, i64::from(MAX_POWER_LEVEL))?;

        Ok(Self {
            name: name.unwrap_or_default(),
            creator_id,
            origin,
            tags,
            year_created,
            power_level,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn creator_id(&self) -> CreatorId {
        self.creator_id
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    pub fn year_created(&self) -> Option<i32> {
        self.year_created
    }

    pub fn power_level(&self) -> Option<i32> {
        self.power_level
    }
}
