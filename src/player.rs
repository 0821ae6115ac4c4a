use std::sync::Arc;

use crate::api::Channel;
use crate::sync::PositionSync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Loading,
    Playing,
    Paused,
    /// Transient sub-state of playing/paused while a seek target is reached.
    Seeking,
    Error,
}

/// Signals from the platform media decoder. The driver attaching a source
/// tags every event with the stream epoch the source was attached under, so
/// late events from a torn-down source are identifiable.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Source buffered enough to start
    CanPlay,
    LoadedMetadata { duration: f64 },
    Playing,
    Paused,
    TimeUpdate { time: f64 },
    SeekCompleted,
    Error { message: String },
}

/// Throttled watch-position side effect produced by a time-update tick.
/// Carries the stream epoch so a resolution after a channel switch can be
/// recognized as stale and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    pub channel_id: i64,
    pub position: u64,
    pub stream_epoch: u64,
}

/// Snapshot of playback state for the presentation shell.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub channel_id: Option<i64>,
    pub status: PlaybackStatus,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f32,
    pub muted: bool,
    pub error_message: Option<String>,
}

/// Owns playback state for the single mounted player.
///
/// One stream epoch per attached source: `load_channel` bumps it, and media
/// events carrying an older epoch are dropped, which is the teardown
/// guarantee against stale event delivery from a replaced source.
pub struct PlaybackController {
    channel: Option<Arc<Channel>>,
    stream_epoch: u64,
    status: PlaybackStatus,
    current_time: f64,
    duration: f64,
    volume: f32,
    muted: bool,
    last_nonzero_volume: f32,
    error: Option<String>,
    resume_status: PlaybackStatus,
    sync: PositionSync,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self {
            channel: None,
            stream_epoch: 0,
            status: PlaybackStatus::Idle,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
            last_nonzero_volume: 1.0,
            error: None,
            resume_status: PlaybackStatus::Paused,
            sync: PositionSync::new(),
        }
    }
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new channel, replacing any current source.
    ///
    /// Always transitions to `loading` with position reset to zero. Returns
    /// the new stream epoch; the driver must tag the new source's events
    /// with it, which retires every event from the previous source.
    pub fn load_channel(&mut self, channel: Arc<Channel>) -> u64 {
        self.stream_epoch += 1;
        self.channel = Some(channel);
        self.status = PlaybackStatus::Loading;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.error = None;
        self.sync = PositionSync::new();
        self.stream_epoch
    }

    /// Detach the player entirely (view teardown).
    pub fn teardown(&mut self) {
        self.stream_epoch += 1;
        self.channel = None;
        self.status = PlaybackStatus::Idle;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.error = None;
        self.sync = PositionSync::new();
    }

    /// Manual reload of the current channel after a playback error.
    pub fn reload(&mut self) -> Option<u64> {
        let channel = self.channel.clone()?;
        Some(self.load_channel(channel))
    }

    /// Process one media event. Events tagged with a retired epoch are
    /// dropped. Returns the throttled position report to persist, if this
    /// tick crossed a boundary.
    pub fn handle_media_event(&mut self, epoch: u64, event: MediaEvent) -> Option<PositionReport> {
        if epoch != self.stream_epoch {
            tracing::debug!(event_epoch = epoch, "dropping media event from torn-down source");
            return None;
        }
        match event {
            MediaEvent::CanPlay => {
                if self.status == PlaybackStatus::Loading {
                    self.status = PlaybackStatus::Playing;
                }
                None
            }
            MediaEvent::LoadedMetadata { duration } => {
                if duration.is_finite() && duration >= 0.0 {
                    self.duration = duration;
                }
                None
            }
            MediaEvent::Playing => {
                if matches!(
                    self.status,
                    PlaybackStatus::Loading | PlaybackStatus::Paused
                ) {
                    self.status = PlaybackStatus::Playing;
                }
                None
            }
            MediaEvent::Paused => {
                if self.status == PlaybackStatus::Playing {
                    self.status = PlaybackStatus::Paused;
                }
                None
            }
            MediaEvent::TimeUpdate { time } => {
                if !matches!(
                    self.status,
                    PlaybackStatus::Playing | PlaybackStatus::Paused | PlaybackStatus::Seeking
                ) {
                    return None;
                }
                if time.is_finite() && time >= 0.0 {
                    self.current_time = time;
                }
                if self.status == PlaybackStatus::Seeking {
                    return None;
                }
                let position = self.sync.on_tick(time)?;
                let channel_id = self.channel.as_ref()?.id;
                Some(PositionReport {
                    channel_id,
                    position,
                    stream_epoch: self.stream_epoch,
                })
            }
            MediaEvent::SeekCompleted => {
                if self.status == PlaybackStatus::Seeking {
                    self.status = self.resume_status;
                }
                None
            }
            MediaEvent::Error { message } => {
                let err = crate::errors::ViewerError::PlaybackFailure(message.clone());
                tracing::warn!(%err, channel_id = ?self.channel.as_ref().map(|c| c.id));
                self.status = PlaybackStatus::Error;
                self.error = Some(message);
                None
            }
        }
    }

    /// Explicit user play/pause toggle.
    pub fn toggle_play(&mut self) {
        self.status = match self.status {
            PlaybackStatus::Playing => PlaybackStatus::Paused,
            PlaybackStatus::Paused => PlaybackStatus::Playing,
            other => other,
        };
    }

    /// Enter the seeking sub-state toward a target position. Valid while
    /// playing or paused; the prior state is restored on seek completion.
    pub fn begin_seek(&mut self, target: f64) {
        if !matches!(
            self.status,
            PlaybackStatus::Playing | PlaybackStatus::Paused
        ) {
            return;
        }
        if !target.is_finite() || target < 0.0 {
            return;
        }
        self.resume_status = self.status;
        self.status = PlaybackStatus::Seeking;
        self.current_time = target;
        self.sync.resync(target);
    }

    /// Jump back to position zero without changing play/pause status.
    pub fn restart(&mut self) {
        if self.status == PlaybackStatus::Idle {
            return;
        }
        self.current_time = 0.0;
        self.sync.resync(0.0);
    }

    /// Volume is orthogonal to the play/pause/error axis. Zero implies
    /// muted; any positive value unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.volume = volume;
        if volume == 0.0 {
            self.muted = true;
        } else {
            self.muted = false;
            self.last_nonzero_volume = volume;
        }
    }

    /// Unmuting restores the last nonzero volume.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            if self.volume == 0.0 {
                self.volume = self.last_nonzero_volume;
            }
        } else {
            self.muted = true;
        }
    }

    pub fn channel(&self) -> Option<&Arc<Channel>> {
        self.channel.as_ref()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn stream_epoch(&self) -> u64 {
        self.stream_epoch
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            channel_id: self.channel.as_ref().map(|c| c.id),
            status: self.status,
            current_time: self.current_time,
            duration: self.duration,
            volume: self.volume,
            muted: self.muted,
            error_message: self.error.clone(),
        }
    }
}

/// mm:ss display for the shell's progress readout.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = seconds as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
