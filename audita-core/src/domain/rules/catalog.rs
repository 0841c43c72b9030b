// audita-core/src/domain/rules/catalog.rs

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;
use crate::domain::record::IncidentRecord;
use crate::domain::rules::settings::RuleSettings;

/// The seven incident fields under data-quality monitoring.
/// Declaration order is the catalog order and the report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitoredField {
    Provider,
    BanEndDate,
    StaffPerson,
    InfractionType,
    InfractionCode,
    ExcludedSites,
    Notes,
}

impl MonitoredField {
    /// Column header used for this field's finding in the error detail table.
    /// Names carried over from the agency's historical report layout.
    pub fn column_name(self) -> &'static str {
        match self {
            MonitoredField::Provider => "Provider Error",
            MonitoredField::BanEndDate => "End Date Error",
            MonitoredField::StaffPerson => "Staff Name Error",
            MonitoredField::InfractionType => "Incident Error",
            MonitoredField::InfractionCode => "Incident Code Error",
            MonitoredField::ExcludedSites => "Sites Excluded From Error",
            MonitoredField::Notes => "Notes Error",
        }
    }
}

impl fmt::Display for MonitoredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MonitoredField::Provider => "provider",
            MonitoredField::BanEndDate => "ban end date",
            MonitoredField::StaffPerson => "staff person",
            MonitoredField::InfractionType => "infraction type",
            MonitoredField::InfractionCode => "infraction code",
            MonitoredField::ExcludedSites => "excluded sites",
            MonitoredField::Notes => "notes",
        };
        write!(f, "{}", name)
    }
}

/// A violation category. Each monitored field emits at most one of these per
/// record; the serialized form is the exact label string of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorLabel {
    #[serde(rename = "Incorrect Provider")]
    IncorrectProvider,
    #[serde(rename = "End Date Should Be Blank")]
    EndDateShouldBeBlank,
    #[serde(rename = "End Date Should Not Be Blank")]
    EndDateShouldNotBeBlank,
    #[serde(rename = "No Staff Name Entered")]
    NoStaffNameEntered,
    #[serde(rename = "No Incident Selected")]
    NoIncidentSelected,
    #[serde(rename = "Non-TPI Incident Selected")]
    NonTpiIncidentSelected,
    #[serde(rename = "No Incident Code Selected")]
    NoIncidentCodeSelected,
    #[serde(rename = "Non-TPI Incident Code Selected")]
    NonTpiIncidentCodeSelected,
    #[serde(rename = "No Sites Excluded From Entry")]
    NoSitesExcluded,
    #[serde(rename = "No Notes Entered")]
    NoNotesEntered,
    #[serde(rename = "Use of department specific shorthand")]
    ShorthandUsed,
}

impl ErrorLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorLabel::IncorrectProvider => "Incorrect Provider",
            ErrorLabel::EndDateShouldBeBlank => "End Date Should Be Blank",
            ErrorLabel::EndDateShouldNotBeBlank => "End Date Should Not Be Blank",
            ErrorLabel::NoStaffNameEntered => "No Staff Name Entered",
            ErrorLabel::NoIncidentSelected => "No Incident Selected",
            ErrorLabel::NonTpiIncidentSelected => "Non-TPI Incident Selected",
            ErrorLabel::NoIncidentCodeSelected => "No Incident Code Selected",
            ErrorLabel::NonTpiIncidentCodeSelected => "Non-TPI Incident Code Selected",
            ErrorLabel::NoSitesExcluded => "No Sites Excluded From Entry",
            ErrorLabel::NoNotesEntered => "No Notes Entered",
            ErrorLabel::ShorthandUsed => "Use of department specific shorthand",
        }
    }
}

impl fmt::Display for ErrorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled condition over one record. Values coming from the settings
/// (provider literal, code, sets, shorthand regex) are baked in at compile
/// time, so evaluation allocates nothing.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// The monitored field has no value.
    IsMissing,
    /// The field's text equals the given literal.
    EqualsLiteral(String),
    /// The field has a value and that value is outside the given closed set.
    NotInSet(BTreeSet<String>),
    /// Ban end date present while the infraction code equals the given code.
    PresentWithCode(String),
    /// Ban end date absent while the infraction code is NOT the given code.
    AbsentWithoutCode(String),
    /// Free text contains the shorthand token. The regex is an alternation of
    /// the all-lowercase and all-uppercase token literals; mixed-case
    /// occurrences do not match. Historical behavior, kept on purpose.
    MatchesShorthand(Regex),
}

impl Predicate {
    pub fn matches(&self, field: MonitoredField, incident: &IncidentRecord) -> bool {
        match self {
            Predicate::IsMissing => incident.field_missing(field),
            Predicate::EqualsLiteral(lit) => incident.field_text(field) == Some(lit.as_str()),
            Predicate::NotInSet(set) => incident
                .field_text(field)
                .is_some_and(|value| !set.contains(value)),
            Predicate::PresentWithCode(code) => {
                incident.ban_end_present()
                    && incident.infraction_code.as_deref() == Some(code.as_str())
            }
            Predicate::AbsentWithoutCode(code) => {
                !incident.ban_end_present()
                    && incident.infraction_code.as_deref() != Some(code.as_str())
            }
            Predicate::MatchesShorthand(pattern) => incident
                .field_text(field)
                .is_some_and(|value| pattern.is_match(value)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::IsMissing => write!(f, "value is missing"),
            Predicate::EqualsLiteral(lit) => write!(f, "value equals \"{}\"", lit),
            Predicate::NotInSet(set) => {
                write!(f, "value outside the recognized set ({} entries)", set.len())
            }
            Predicate::PresentWithCode(code) => {
                write!(f, "end date present and code is \"{}\"", code)
            }
            Predicate::AbsentWithoutCode(code) => {
                write!(f, "end date absent and code is not \"{}\"", code)
            }
            Predicate::MatchesShorthand(pattern) => {
                write!(f, "text matches /{}/", pattern.as_str())
            }
        }
    }
}

/// One (predicate, label) pair of a field's rule chain.
#[derive(Debug, Clone)]
pub struct FieldCheck {
    pub predicate: Predicate,
    pub label: ErrorLabel,
}

/// The ordered rule chain of one monitored field. The first matching
/// predicate determines the emitted label; no match means no finding.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: MonitoredField,
    pub checks: Vec<FieldCheck>,
}

/// The full compiled rule table. One entry per monitored field, evaluated
/// by a single generic walk — adding a field is a new entry here, not a new
/// branch anywhere else. The catalog length drives every downstream
/// denominator (error rates are per record × monitored field).
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<FieldRule>,
}

impl RuleCatalog {
    /// Compiles the settings into the predicate table. Fails on invalid
    /// settings (empty sets, empty token) before any record is touched.
    pub fn compile(settings: &RuleSettings) -> Result<Self, DomainError> {
        settings
            .validate()
            .map_err(|e| DomainError::InvalidRuleSettings(e.to_string()))?;

        let shorthand = shorthand_pattern(&settings.shorthand_token)?;
        let types: BTreeSet<String> = settings.recognized_types.iter().cloned().collect();
        let codes: BTreeSet<String> = settings.recognized_codes.iter().cloned().collect();

        let rules = vec![
            FieldRule {
                field: MonitoredField::Provider,
                checks: vec![FieldCheck {
                    predicate: Predicate::EqualsLiteral(settings.flagged_provider.clone()),
                    label: ErrorLabel::IncorrectProvider,
                }],
            },
            FieldRule {
                field: MonitoredField::BanEndDate,
                // The four (presence × code match) combinations, enumerated:
                // present+match and absent+mismatch are findings, the other
                // two fall through to "no finding".
                checks: vec![
                    FieldCheck {
                        predicate: Predicate::PresentWithCode(
                            settings.reinstatement_code.clone(),
                        ),
                        label: ErrorLabel::EndDateShouldBeBlank,
                    },
                    FieldCheck {
                        predicate: Predicate::AbsentWithoutCode(
                            settings.reinstatement_code.clone(),
                        ),
                        label: ErrorLabel::EndDateShouldNotBeBlank,
                    },
                ],
            },
            FieldRule {
                field: MonitoredField::StaffPerson,
                checks: vec![FieldCheck {
                    predicate: Predicate::IsMissing,
                    label: ErrorLabel::NoStaffNameEntered,
                }],
            },
            FieldRule {
                field: MonitoredField::InfractionType,
                checks: vec![
                    FieldCheck {
                        predicate: Predicate::IsMissing,
                        label: ErrorLabel::NoIncidentSelected,
                    },
                    FieldCheck {
                        predicate: Predicate::NotInSet(types),
                        label: ErrorLabel::NonTpiIncidentSelected,
                    },
                ],
            },
            FieldRule {
                field: MonitoredField::InfractionCode,
                checks: vec![
                    FieldCheck {
                        predicate: Predicate::IsMissing,
                        label: ErrorLabel::NoIncidentCodeSelected,
                    },
                    FieldCheck {
                        predicate: Predicate::NotInSet(codes),
                        label: ErrorLabel::NonTpiIncidentCodeSelected,
                    },
                ],
            },
            FieldRule {
                field: MonitoredField::ExcludedSites,
                checks: vec![FieldCheck {
                    predicate: Predicate::IsMissing,
                    label: ErrorLabel::NoSitesExcluded,
                }],
            },
            FieldRule {
                field: MonitoredField::Notes,
                checks: vec![
                    FieldCheck {
                        predicate: Predicate::IsMissing,
                        label: ErrorLabel::NoNotesEntered,
                    },
                    FieldCheck {
                        predicate: Predicate::MatchesShorthand(shorthand),
                        label: ErrorLabel::ShorthandUsed,
                    },
                ],
            },
        ];

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Number of active monitored fields. This is the denominator factor of
    /// every error rate — derived, never a literal.
    pub fn monitored_field_count(&self) -> usize {
        self.rules.len()
    }
}

/// Compile-once shorthand matcher (escaped lowercase | escaped uppercase).
fn shorthand_pattern(token: &str) -> Result<Regex, DomainError> {
    let pattern = format!(
        "{}|{}",
        regex::escape(&token.to_lowercase()),
        regex::escape(&token.to_uppercase())
    );
    Regex::new(&pattern).map_err(|e| {
        DomainError::InvalidRuleSettings(format!("shorthand token '{}': {}", token, e))
    })
}
