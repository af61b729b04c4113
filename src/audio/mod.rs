//! Audio domain: injected sound capability and its Bevy playback backend.
//!
//! Gameplay code only sees `SoundPlayer`. The game hands it a `SoundQueue`,
//! which a system turns into audio entities once per frame.

use bevy::audio::Volume;
use bevy::prelude::*;


pub trait SoundPlayer {
    fn play_sound(&mut self, name: &str, looping: bool, volume: f32);
    fn stop_sound(&mut self, name: &str);
    /// Replaces whatever music is playing.
    fn play_music(&mut self, name: &str, looping: bool, volume: f32);
    fn stop_music(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SoundCommand {
    Play {
        name: String,
        looping: bool,
        volume: f32,
        music: bool,
    },
    Stop {
        name: String,
    },
    StopMusic,
}

/// Sound requests recorded during the tick, drained by `play_queued_sounds`.
#[derive(Resource, Debug, Default)]
pub struct SoundQueue {
    pub commands: Vec<SoundCommand>,
}

impl SoundPlayer for SoundQueue {
    fn play_sound(&mut self, name: &str, looping: bool, volume: f32) {
        self.commands.push(SoundCommand::Play {
            name: name.to_string(),
            looping,
            volume,
            music: false,
        });
    }

    fn stop_sound(&mut self, name: &str) {
        self.commands.push(SoundCommand::Stop {
            name: name.to_string(),
        });
    }

    fn play_music(&mut self, name: &str, looping: bool, volume: f32) {
        self.commands.push(SoundCommand::StopMusic);
        self.commands.push(SoundCommand::Play {
            name: name.to_string(),
            looping,
            volume,
            music: true,
        });
    }

    fn stop_music(&mut self) {
        self.commands.push(SoundCommand::StopMusic);
    }
}

/// Live audio entity spawned for a named sound or music track.
#[derive(Component, Debug)]
struct SoundTrack {
    name: String,
    music: bool,
}

fn sound_path(name: &str, music: bool) -> String {
    if music {
        format!("music/{}.ogg", name)
    } else {
        format!("sounds/{}.ogg", name)
    }
}

fn play_queued_sounds(
    mut commands: Commands,
    mut queue: ResMut<SoundQueue>,
    asset_server: Res<AssetServer>,
    tracks: Query<(Entity, &SoundTrack)>,
) {
    for command in queue.commands.drain(..) {
        match command {
            SoundCommand::Play {
                name,
                looping,
                volume,
                music,
            } => {
                let settings = if looping {
                    PlaybackSettings::LOOP
                } else {
                    PlaybackSettings::DESPAWN
                };
                commands.spawn((
                    AudioPlayer::new(asset_server.load(sound_path(&name, music))),
                    settings.with_volume(Volume::Linear(volume)),
                    SoundTrack { name, music },
                ));
            }
            SoundCommand::Stop { name } => {
                for (entity, track) in &tracks {
                    if !track.music && track.name == name {
                        commands.entity(entity).despawn();
                    }
                }
            }
            SoundCommand::StopMusic => {
                for (entity, track) in &tracks {
                    if track.music {
                        commands.entity(entity).despawn();
                    }
                }
            }
        }
    }
}

pub struct AudioCuesPlugin;

impl Plugin for AudioCuesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundQueue>()
            .add_systems(Update, play_queued_sounds);
    }
}
