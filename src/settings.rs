use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::{draft::PhotoPolicy, greenness::ProfileKind, log_view::SortPolicy, log_warn};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub scoring_profile: ProfileKind,
    pub sort_policy: SortPolicy,
    pub require_photo: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            scoring_profile: ProfileKind::Emerald,
            sort_policy: SortPolicy::RatingFirst,
            require_photo: true,
        }
    }
}

impl UserSettings {
    pub fn photo_policy(&self) -> PhotoPolicy {
        PhotoPolicy::from_required(self.require_photo)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring unreadable settings {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> UserSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: UserSettings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
