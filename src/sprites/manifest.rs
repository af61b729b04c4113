//! Sprite manifest loading for per-state animation clips.
//!
//! The manifest is JSON listing, for each locomotion state, the frame image
//! paths and the delay between frames in milliseconds.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::movement::LocomotionState;

/// One clip as written in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ClipDef {
    pub state: LocomotionState,
    /// Frame image paths, relative to assets/.
    #[serde(default)]
    pub frames: Vec<String>,
    pub frame_delay_ms: f32,
}

/// Raw manifest JSON structure.
#[derive(Debug, Deserialize)]
pub struct ManifestJson {
    pub version: u32,
    /// Rendered sprite size in pixels.
    pub size: f32,
    pub clips: Vec<ClipDef>,
}

impl ManifestJson {
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}

/// Loaded player animation frames, keyed by locomotion state.
#[derive(Resource, Debug, Default)]
pub struct PlayerAnimations {
    pub size: Option<f32>,
    pub delays: HashMap<LocomotionState, f32>,
    pub frames: HashMap<LocomotionState, Vec<Handle<Image>>>,
}

impl PlayerAnimations {
    /// Load the manifest and queue its frame images. A missing or broken
    /// manifest leaves the animations empty and the player drawn as a plain box.
    pub fn load_from_file(&mut self, path: &str, asset_server: &AssetServer) {
        let manifest_path = Path::new(path);

        if !manifest_path.exists() {
            warn!(
                "Sprite manifest not found at {:?}, drawing placeholders",
                path
            );
            return;
        }

        let contents = match fs::read_to_string(manifest_path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to read sprite manifest: {}", e);
                return;
            }
        };

        let manifest = match ManifestJson::parse(&contents) {
            Ok(m) => m,
            Err(e) => {
                error!("Failed to parse sprite manifest: {}", e);
                return;
            }
        };

        self.size = Some(manifest.size);
        for clip in manifest.clips {
            let handles = clip
                .frames
                .iter()
                .map(|frame| asset_server.load(frame.clone()))
                .collect();
            self.delays.insert(clip.state, clip.frame_delay_ms);
            self.frames.insert(clip.state, handles);
        }

        info!(
            "Loaded sprite manifest v{} with {} clips",
            manifest.version,
            self.frames.len()
        );
    }

    pub fn frame(&self, state: LocomotionState, index: usize) -> Option<Handle<Image>> {
        self.frames.get(&state)?.get(index).cloned()
    }
}
