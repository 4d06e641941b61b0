//! Identity types for RELIC entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type discriminator, used in error messages and storage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EntityKind {
    Creator,
    Artifact,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Creator => "Creator",
            EntityKind::Artifact => "Artifact",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of the server-assigned integer identifiers.
///
/// Each entity gets its own newtype so a `CreatorId` can never be passed
/// where an `ArtifactId` is expected. Path extractors in the API crate are
/// generic over this trait.
pub trait EntityIdType:
    Copy + Eq + std::hash::Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Human-readable entity name for error messages.
    const ENTITY_NAME: &'static str;

    /// Entity discriminator.
    const KIND: EntityKind;

    /// Wrap a raw database identifier.
    fn new(raw: i64) -> Self;

    /// Unwrap to the raw database identifier.
    fn as_i64(&self) -> i64;
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr, $entity_name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl EntityIdType for $name {
            const ENTITY_NAME: &'static str = $entity_name;
            const KIND: EntityKind = $kind;

            fn new(raw: i64) -> Self {
                Self(raw)
            }

            fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a [`crate::Creator`].
    CreatorId,
    EntityKind::Creator,
    "creator"
);

define_entity_id!(
    /// Identifier of a [`crate::Artifact`].
    ArtifactId,
    EntityKind::Artifact,
    "artifact"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_numbers() -> Result<(), serde_json::Error> {
        let id = CreatorId::new(42);
        assert_eq!(serde_json::to_string(&id)?, "42");

        let parsed: ArtifactId = serde_json::from_str("7")?;
        assert_eq!(parsed.as_i64(), 7);
        Ok(())
    }

    #[test]
    fn test_id_display_and_metadata() {
        assert_eq!(ArtifactId(3).to_string(), "3");
        assert_eq!(CreatorId::ENTITY_NAME, "creator");
        assert_eq!(ArtifactId::KIND, EntityKind::Artifact);
        assert_eq!(EntityKind::Creator.to_string(), "Creator");
    }
}
