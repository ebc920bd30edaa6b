//! The skin registry: owns each player's decoded skin and registered texture.
//!
//! All mutations for a given player are expected to run on the designated
//! main thread (see [`crate::queue`]); the registry itself holds no locks and
//! enforces nothing. Replacing a skin always releases the previous image and
//! sink resource first, so there is at most one live buffer per player and
//! the sink never sees two registrations under the same key — except during
//! [`SkinRegistry::refresh`], where destroy-then-recreate is the point.

use std::{collections::HashMap, path::Path};

use log::{info, warn};
use uuid::Uuid;

use crate::{
    error::SkinError,
    files,
    image::{validate_dimensions, SkinImage},
    settings::{SettingsStore, SkinRecord},
    sync::{SkinChangeRequest, SyncSender, SKIN_REQUEST_CHANNEL},
};

/// Namespace prefixed to every texture key handed to the render sink.
const TEXTURE_NAMESPACE: &str = "customskin";

/// Opaque, stable player identity.
pub type PlayerId = Uuid;

/// Opaque resource identifier minted by the render sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u64);

impl TextureHandle {
    pub fn new(raw: u64) -> TextureHandle {
        TextureHandle(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The only two operations this core needs from the host rendering
/// subsystem.
pub trait TextureSink {
    /// Uploads `image` under `key` and returns a handle for it. Returns
    /// `SinkUnavailable` while the render backend is not ready; the registry
    /// keeps the skin and retries on [`SkinRegistry::refresh`].
    fn register_texture(&mut self, key: &str, image: &SkinImage) -> Result<TextureHandle, SkinError>;

    /// Releases the resource behind `handle`.
    fn release_texture(&mut self, handle: TextureHandle);
}

/// What a successful load reports back, for user-facing status messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinSummary {
    pub file_name: String,
    pub slim: bool,
    pub width: u32,
    pub height: u32,
}

/// Per-load overrides. An explicit slim flag always beats the filename
/// heuristic; the nickname lands in the persisted record.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub slim_override: Option<bool>,
    pub nickname: Option<String>,
}

struct SkinEntry {
    image: SkinImage,
    slim: bool,
    file_name: String,

    /// `None` while the sink was unavailable at registration time.
    handle: Option<TextureHandle>,
}

/// In-memory mapping from player identity to decoded skin and texture.
pub struct SkinRegistry {
    entries: HashMap<PlayerId, SkinEntry>,
    settings: SettingsStore,
    sink: Box<dyn TextureSink>,
    sync: Box<dyn SyncSender>,

    /// Applied to loads that carry no explicit slim override and whose
    /// filename doesn't decide it. Toggled from the UI.
    slim_mode: bool,
}

impl SkinRegistry {
    pub fn new(
        settings: SettingsStore,
        sink: Box<dyn TextureSink>,
        sync: Box<dyn SyncSender>,
    ) -> SkinRegistry {
        SkinRegistry {
            entries: HashMap::new(),
            settings,
            sink,
            sync,
            slim_mode: false,
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn slim_mode(&self) -> bool {
        self.slim_mode
    }

    pub fn set_slim_mode(&mut self, slim: bool) {
        self.slim_mode = slim;
        info!("slim mode set to {slim}");
    }

    /// The deterministic render-sink key for `player`. One player, one key.
    pub fn texture_key(player: PlayerId) -> String {
        format!("{TEXTURE_NAMESPACE}:dynamic/{}", player.simple())
    }

    /// Decodes, validates and installs a skin for `player` from raw PNG
    /// bytes. `source_path` is where the bytes came from; its file name feeds
    /// the slim heuristic and the persisted record.
    ///
    /// On success the previous skin for the player (if any) has been fully
    /// released, the new texture is registered, the record is persisted when
    /// auto-save is on, and a sync request has been handed to the transport.
    pub fn load_from_bytes(
        &mut self,
        player: PlayerId,
        bytes: &[u8],
        source_path: &Path,
        options: &LoadOptions,
    ) -> Result<SkinSummary, SkinError> {
        if bytes.is_empty() {
            return Err(SkinError::FileEmpty);
        }

        if bytes.len() as u64 > files::MAX_SKIN_FILE_BYTES {
            return Err(SkinError::FileTooLarge {
                size: bytes.len() as u64,
                max: files::MAX_SKIN_FILE_BYTES,
            });
        }

        // The decoded buffer is dropped on any validation failure below,
        // before the error propagates.
        let image = SkinImage::decode(bytes)?;

        validate_dimensions(image.width(), image.height(), self.settings.max_skin_size())?;

        let file_name = file_name_of(source_path);

        let slim = options
            .slim_override
            .unwrap_or_else(|| slim_from_file_name(&file_name) || self.slim_mode);

        let summary = self.install(player, image, slim, file_name);

        if self.settings.auto_save() {
            self.settings.put(
                player,
                SkinRecord {
                    skin_path: source_path.display().to_string(),
                    skin_name: summary.file_name.clone(),
                    is_slim: summary.slim,
                    last_used: chrono::Utc::now().timestamp_millis(),
                    width: summary.width,
                    height: summary.height,
                    texture_id: Self::texture_key(player),
                    nickname: options.nickname.clone().unwrap_or_default(),
                },
            );
        }

        self.send_sync_request(player, source_path, &summary);

        info!(
            "loaded skin '{}' for player {player} (slim: {}, {}x{})",
            summary.file_name, summary.slim, summary.width, summary.height
        );

        Ok(summary)
    }

    /// [`Self::load_from_bytes`], but starting from a file on disk.
    pub fn load_from_file(
        &mut self,
        player: PlayerId,
        path: &Path,
        options: &LoadOptions,
    ) -> Result<SkinSummary, SkinError> {
        let bytes = files::read_skin_file(path)?;
        self.load_from_bytes(player, &bytes, path, options)
    }

    /// Startup path: re-applies the persisted skin for `player`, if there is
    /// one. Every failure here degrades to a logged skip — a stale record
    /// must never prevent the add-on from coming up. Does not re-save the
    /// record and does not emit a sync request.
    ///
    /// Returns whether a skin was restored.
    pub fn restore_saved(&mut self, player: PlayerId) -> bool {
        let Some(record) = self.settings.get(player).cloned() else {
            info!("no saved skin for player {player}");
            return false;
        };

        let path = Path::new(&record.skin_path).to_path_buf();

        let bytes = match files::read_skin_file(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("saved skin for player {player} could not be read: {err}");
                return false;
            }
        };

        let image = match SkinImage::decode(&bytes) {
            Ok(image) => image,
            Err(err) => {
                warn!("saved skin for player {player} could not be decoded: {err}");
                return false;
            }
        };

        if let Err(err) =
            validate_dimensions(image.width(), image.height(), self.settings.max_skin_size())
        {
            warn!("saved skin for player {player} is no longer valid: {err}");
            return false;
        }

        let summary = self.install(player, image, record.is_slim, record.skin_name);

        info!(
            "restored saved skin '{}' for player {player} (slim: {})",
            summary.file_name, summary.slim
        );

        true
    }

    /// Removes `player`'s skin: buffer freed, sink resource released,
    /// persisted record removed. Clearing an absent player is a no-op.
    pub fn clear(&mut self, player: PlayerId) {
        if let Some(entry) = self.entries.remove(&player) {
            if let Some(handle) = entry.handle {
                self.sink.release_texture(handle);
            }

            info!("cleared skin for player {player}");
        }

        self.settings.remove(player);
    }

    /// Releases every buffer and handle. Persisted records are left alone;
    /// this is the shutdown/mass-reset path, not a bulk [`Self::clear`].
    pub fn clear_all(&mut self) {
        for (_, entry) in self.entries.drain() {
            if let Some(handle) = entry.handle {
                self.sink.release_texture(handle);
            }
        }

        info!("cleared all skins");
    }

    pub fn has_skin(&self, player: PlayerId) -> bool {
        self.entries.contains_key(&player)
    }

    /// The current texture handle, or `None` when there is no skin or the
    /// sink was unavailable when the skin arrived.
    pub fn texture_handle_of(&self, player: PlayerId) -> Option<TextureHandle> {
        self.entries.get(&player).and_then(|entry| entry.handle)
    }

    pub fn summary_of(&self, player: PlayerId) -> Option<SkinSummary> {
        self.entries.get(&player).map(|entry| SkinSummary {
            file_name: entry.file_name.clone(),
            slim: entry.slim,
            width: entry.image.width(),
            height: entry.image.height(),
        })
    }

    /// Destroys and recreates `player`'s texture without touching the backing
    /// image. The sink caches resources by key and does not observe in-place
    /// pixel changes, so this is the only way to force it to re-read them.
    /// Also the retry path after `SinkUnavailable`.
    pub fn refresh(&mut self, player: PlayerId) {
        let key = Self::texture_key(player);

        let Some(entry) = self.entries.get_mut(&player) else {
            return;
        };

        if let Some(old) = entry.handle.take() {
            self.sink.release_texture(old);
        }

        entry.handle = match self.sink.register_texture(&key, &entry.image) {
            Ok(handle) => {
                info!("refreshed texture {key}");
                Some(handle)
            }
            Err(err) => {
                warn!("could not refresh texture {key}: {err}");
                None
            }
        };
    }

    /// Replaces any existing entry for `player` with a fresh one. The old
    /// sink resource is released and the old buffer dropped before the new
    /// registration happens.
    fn install(
        &mut self,
        player: PlayerId,
        image: SkinImage,
        slim: bool,
        file_name: String,
    ) -> SkinSummary {
        if let Some(old) = self.entries.remove(&player) {
            if let Some(handle) = old.handle {
                self.sink.release_texture(handle);
            }

            // Old image buffer dropped here.
        }

        let key = Self::texture_key(player);

        let handle = match self.sink.register_texture(&key, &image) {
            Ok(handle) => {
                info!("registered texture {key}");
                Some(handle)
            }
            Err(err) => {
                warn!("skipping texture registration for {key}: {err}");
                None
            }
        };

        let summary = SkinSummary {
            file_name: file_name.clone(),
            slim,
            width: image.width(),
            height: image.height(),
        };

        self.entries.insert(
            player,
            SkinEntry {
                image,
                slim,
                file_name,
                handle,
            },
        );

        summary
    }

    fn send_sync_request(&mut self, player: PlayerId, source_path: &Path, summary: &SkinSummary) {
        let request = SkinChangeRequest {
            player,
            skin_path: source_path.display().to_string(),
            slim: summary.slim,
            width: summary.width as i32,
            height: summary.height as i32,
        };

        let mut payload = Vec::new();

        if let Err(err) = request.write_to(&mut payload) {
            warn!("could not encode skin change request: {err}");
            return;
        }

        self.sync.send(SKIN_REQUEST_CHANNEL, &payload);
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Filename heuristic for the slim body model: `_slim` or `_alex` anywhere in
/// the (lowercased) name means slim.
fn slim_from_file_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.contains("_slim") || lower.contains("_alex")
}
