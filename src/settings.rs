//! Saving and loading of the add-on's settings and per-player skin records.
//!
//! The settings are one JSON file. A missing file means defaults; a corrupt
//! file is logged and also means defaults, never a crash. Every mutating call
//! writes the file back before returning, so a crash at any point leaves the
//! previous file or a truncated one, both of which load as something usable.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use eyre::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SkinError;

/// One persisted skin choice for one player.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinRecord {
    /// Path of the source image on this machine.
    #[serde(rename = "skinPath")]
    pub skin_path: String,

    /// Display name, normally the source file name.
    #[serde(rename = "skinName")]
    pub skin_name: String,

    #[serde(rename = "isSlim")]
    pub is_slim: bool,

    /// Wall-clock milliseconds at the time the skin was last applied.
    #[serde(rename = "lastUsed")]
    pub last_used: i64,

    pub width: u32,
    pub height: u32,

    /// The texture key the skin was registered under.
    #[serde(rename = "textureId")]
    pub texture_id: String,

    pub nickname: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct SettingsData {
    /// Player UUID string to skin record. Ordered so that serialization is
    /// deterministic and saving an unchanged store is byte-idempotent.
    #[serde(rename = "playerSkins")]
    player_skins: BTreeMap<String, SkinRecord>,

    #[serde(rename = "enableHDSupport")]
    enable_hd_support: bool,

    /// Maximum skin dimension accepted by validation.
    #[serde(rename = "maxSkinSize")]
    max_skin_size: u32,

    #[serde(rename = "autoSaveSkins")]
    auto_save_skins: bool,

    #[serde(rename = "defaultSkinPath")]
    default_skin_path: String,
}

impl Default for SettingsData {
    fn default() -> SettingsData {
        SettingsData {
            player_skins: BTreeMap::new(),
            enable_hd_support: true,
            max_skin_size: 4096,
            auto_save_skins: true,
            default_skin_path: String::new(),
        }
    }
}

/// The settings file plus its in-memory image.
pub struct SettingsStore {
    path: PathBuf,
    data: SettingsData,
}

impl SettingsStore {
    /// Loads the settings at `path`.
    ///
    /// Never fails: an absent file produces defaults (and creates the file),
    /// and a corrupt file is logged and treated as "start fresh".
    pub fn load(path: impl Into<PathBuf>) -> SettingsStore {
        let path = path.into();

        let data = match Self::read_file(&path) {
            Ok(Some(data)) => {
                log::info!("loaded settings from {}", path.display());
                data
            }

            Ok(None) => {
                log::info!("no settings file at {}; creating one", path.display());
                SettingsData::default()
            }

            Err(err) => {
                log::error!(
                    "settings file {} is unusable, starting fresh: {err:?}",
                    path.display()
                );
                SettingsData::default()
            }
        };

        let store = SettingsStore { path, data };

        // Make sure a file exists so the user has something to edit.
        store.save();

        store
    }

    fn read_file(path: &Path) -> Result<Option<SettingsData>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        Ok(Some(Self::parse(&contents)?))
    }

    fn parse(contents: &str) -> Result<SettingsData, SkinError> {
        serde_json::from_str(contents).map_err(|err| SkinError::SettingsCorrupt(err.to_string()))
    }

    fn try_save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, serde_json::to_string_pretty(&self.data)?)?;

        Ok(())
    }

    /// Writes the settings file. Errors are logged, never propagated.
    pub fn save(&self) {
        if let Err(err) = self.try_save() {
            log::error!("error saving settings to {}: {err:?}", self.path.display());
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, player: Uuid) -> Option<&SkinRecord> {
        self.data.player_skins.get(&player.to_string())
    }

    /// Stores `record` for `player` and persists before returning.
    pub fn put(&mut self, player: Uuid, record: SkinRecord) {
        self.data.player_skins.insert(player.to_string(), record);
        self.save();

        log::info!("saved skin record for player {player}");
    }

    /// Removes the record for `player`, if any. Only an actual removal
    /// touches the file, so removing an absent player is a true no-op.
    pub fn remove(&mut self, player: Uuid) {
        if self.data.player_skins.remove(&player.to_string()).is_some() {
            self.save();
            log::info!("removed skin record for player {player}");
        }
    }

    pub fn hd_support(&self) -> bool {
        self.data.enable_hd_support
    }

    pub fn set_hd_support(&mut self, enabled: bool) {
        self.data.enable_hd_support = enabled;
        self.save();
    }

    pub fn max_skin_size(&self) -> u32 {
        self.data.max_skin_size
    }

    pub fn set_max_skin_size(&mut self, size: u32) {
        self.data.max_skin_size = size;
        self.save();
    }

    pub fn auto_save(&self) -> bool {
        self.data.auto_save_skins
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.data.auto_save_skins = enabled;
        self.save();
    }

    pub fn default_skin_path(&self) -> &str {
        &self.data.default_skin_path
    }

    pub fn set_default_skin_path(&mut self, path: impl Into<String>) {
        self.data.default_skin_path = path.into();
        self.save();
    }

    pub fn nickname(&self, player: Uuid) -> &str {
        self.get(player)
            .map(|record| record.nickname.as_str())
            .unwrap_or("")
    }

    /// Updates the nickname on an existing record. Without a record there is
    /// nothing to attach the nickname to, so the call is ignored.
    pub fn set_nickname(&mut self, player: Uuid, nickname: impl Into<String>) {
        if let Some(record) = self.data.player_skins.get_mut(&player.to_string()) {
            record.nickname = nickname.into();
            self.save();
        }
    }
}
