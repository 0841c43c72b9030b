// audita-core/src/domain/rules/settings.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// The agency-specific inputs of the rule catalog. Everything in here is
/// configuration: the catalog compiles these values into predicates, so a
/// change of provider string or code list never touches rule logic.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RuleSettings {
    /// Provider string that flags an incident as entered under the wrong
    /// provider. The check is an equality check, kept as the agency defined it.
    #[validate(length(min = 1, message = "flagged_provider cannot be empty"))]
    pub flagged_provider: String,

    /// The infraction code that requires reinstatement. Dictates whether a
    /// ban end date is expected to be present or blank.
    #[validate(length(min = 1, message = "reinstatement_code cannot be empty"))]
    pub reinstatement_code: String,

    /// Closed set of infraction types the agency recognizes.
    #[validate(length(min = 1, message = "recognized_types needs at least one entry"))]
    pub recognized_types: Vec<String>,

    /// Closed set of infraction codes the agency recognizes.
    #[validate(length(min = 1, message = "recognized_codes needs at least one entry"))]
    pub recognized_codes: Vec<String>,

    /// Department shorthand flagged when it appears in free-text notes.
    /// Matching is intentionally limited to the all-lowercase and
    /// all-uppercase forms of this token (see the catalog).
    #[validate(length(min = 1, message = "shorthand_token cannot be empty"))]
    pub shorthand_token: String,
}
