// audita-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::rules::RuleSettings;
use crate::infrastructure::error::InfrastructureError;

/// Where the two source tables live, relative to the project directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFiles {
    pub incidents: PathBuf,
    pub directory: PathBuf,
}

/// The project manifest (`audita.yaml`): identity, paths and the rule
/// settings. The engine itself only ever sees the `rules` part — paths are
/// adapter wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub version: String,
    #[serde(default = "default_target_path")]
    pub target_path: String,
    #[serde(default = "default_profile")]
    pub profile: String,
    pub sources: SourceFiles,
    pub rules: RuleSettings,
}

fn default_target_path() -> String {
    "target".into()
}

fn default_profile() -> String {
    "dev".into()
}

// --- LOADER ---

#[instrument(skip(project_dir))] // Log automatique de l'entrée/sortie de la fonction
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    // 2. Chargement YAML
    let content = fs::read_to_string(&config_path).map_err(InfrastructureError::Io)?;
    let mut config: ProjectConfig =
        serde_yaml::from_str(&content).map_err(InfrastructureError::Yaml)?;

    // 3. Override via Variables d'Environnement (Pattern 'Layering')
    // Permet de faire: AUDITA_TARGET_PATH=/tmp/build audita run
    apply_env_overrides(&mut config);

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    let candidates = ["audita.yaml", "audita_project.yaml"];
    for filename in candidates {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, candidates
    )))
}

fn apply_env_overrides(config: &mut ProjectConfig) {
    if let Ok(val) = std::env::var("AUDITA_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Ok(val) = std::env::var("AUDITA_PROFILE") {
        info!(old = ?config.profile, new = ?val, "Overriding profile via ENV");
        config.profile = val;
    }
}

// --- UNIT TESTS ---
#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"
name: exclusion_dq
version: "0.1.0"
sources:
  incidents: data/incidents.json
  directory: data/staff_directory.json
rules:
  flagged_provider: "Transition Projects (TPI) - Agency - SP(19)"
  reinstatement_code: "TPI_Exclusion - Agency (Requires Reinstatement)"
  recognized_types:
    - Alcohol
    - Drugs
  recognized_codes:
    - Bar - Other
  shorthand_token: uno
"#;

    #[test]
    fn test_load_project_config() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("audita.yaml"), MANIFEST)?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "exclusion_dq");
        assert_eq!(config.target_path, "target"); // default applied
        assert_eq!(config.profile, "dev"); // default applied
        assert_eq!(config.sources.incidents, PathBuf::from("data/incidents.json"));
        assert_eq!(config.rules.recognized_types.len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_config_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let result = load_project_config(dir.path());
        assert!(matches!(
            result,
            Err(InfrastructureError::ConfigNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_malformed_yaml_is_fatal() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("audita.yaml"), "name: [unclosed")?;
        let result = load_project_config(dir.path());
        assert!(matches!(result, Err(InfrastructureError::Yaml(_))));
        Ok(())
    }

    #[test]
    fn test_alternate_manifest_name_found() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("audita_project.yaml"), MANIFEST)?;
        assert!(load_project_config(dir.path()).is_ok());
        Ok(())
    }
}
