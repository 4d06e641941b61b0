//! Creator-related API types

use relic_core::validate::ValidateNonEmpty;
use relic_core::{Creator, CreatorDraft, CreatorId, ValidationError};
use serde::{Deserialize, Serialize};

/// Request body for creating or replacing a creator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct CreatorSaveRequest {
    /// Unique name, compared ignoring case
    pub name: Option<String>,
    pub race: Option<String>,
    pub realm: Option<String>,
}

impl CreatorSaveRequest {
    /// Validate into a draft. Over HTTP all three fields are required.
    pub fn into_draft(self) -> Result<CreatorDraft, ValidationError> {
        self.race.validate_non_empty("race")?;
        self.realm.validate_non_empty("realm")?;
        CreatorDraft::new(self.name, self.race, self.realm)
    }
}

/// Creator as returned by the API, also nested inside artifact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub id: CreatorId,
    pub name: String,
    pub race: Option<String>,
    pub realm: Option<String>,
}

impl From<Creator> for CreatorResponse {
    fn from(creator: Creator) -> Self {
        Self {
            id: creator.id,
            name: creator.name,
            race: creator.race,
            realm: creator.realm,
        }
    }
}
