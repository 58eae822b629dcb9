//! Type definitions for jukebox-remote
//!
//! Source of truth for all data structures.

use crate::core::poller::DEFAULT_INTERVAL;
use serde::{Deserialize, Deserializer, Serialize};

/// `added_by` value the server uses for tracks it picked itself
pub const AUTOPLAY_SENTINEL: &str = "autoplay";

/// Tag sent with `/add` when no local alias is set
pub const ANONYMOUS: &str = "Anonymous";

/// Treat an explicit JSON `null` the same as a missing field
fn default_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================
// Remote State Types
// ============================================

/// Point-in-time state of the jukebox as returned by `GET /queue`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Absent or null when nothing is playing
    #[serde(default)]
    pub now: Option<NowPlaying>,
    /// Play order
    #[serde(default, deserialize_with = "default_if_null")]
    pub queue: Vec<QueueItem>,
    /// Oldest first
    #[serde(default, deserialize_with = "default_if_null")]
    pub history: Vec<HistoryItem>,
}

/// The track currently loaded in the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub title: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub uploader: String,
    /// Seconds; not guaranteed to be <= duration
    #[serde(default, deserialize_with = "default_if_null")]
    pub position: f64,
    /// Seconds
    #[serde(default, deserialize_with = "default_if_null")]
    pub duration: f64,
    #[serde(default, deserialize_with = "default_if_null")]
    pub paused: bool,
}

/// A queued track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub uploader: String,
    /// Seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Free-form tag of whoever queued it, or [`AUTOPLAY_SENTINEL`]
    #[serde(default)]
    pub added_by: Option<String>,
}

impl QueueItem {
    pub fn is_autoplay(&self) -> bool {
        self.added_by.as_deref() == Some(AUTOPLAY_SENTINEL)
    }
}

/// A played track; its index in `Snapshot::history` is its age
pub type HistoryItem = QueueItem;

// ============================================
// Request / Response Types
// ============================================

/// Body of `POST /add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddRequest {
    pub q: String,
    pub play_next: bool,
    pub allow_age_restricted: bool,
    /// Display label only; the server must not treat it as identity
    pub by: String,
}

/// Answer to `POST /add`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddResponse {
    /// Missing means failure; the server answers errors with `{error}` only
    #[serde(default, deserialize_with = "default_if_null")]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /seek`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekRequest {
    pub pos: f64,
}

/// A body-less or seek command bound to a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Skip,
    Seek { pos: f64 },
}

impl Command {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Command::Play => "/play",
            Command::Pause => "/pause",
            Command::Skip => "/skip",
            Command::Seek { .. } => "/seek",
        }
    }

    pub fn payload(&self) -> Option<SeekRequest> {
        match *self {
            Command::Seek { pos } => Some(SeekRequest { pos }),
            _ => None,
        }
    }
}

/// What happened to a dispatched command, after alerts and refresh are done
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Nothing sent: empty query or replay target not found
    Ignored,
    /// Remote accepted the call; state refreshed
    Applied,
    /// Remote answered `ok: false`; alerted and refreshed
    Rejected(String),
    /// Transport failure; alerted, no refresh
    Failed(String),
}

// ============================================
// Local Identity Types
// ============================================

/// Locally persisted alias, stored as `{alias?, emoji?}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl UserIdentity {
    /// Label sent as `by` with every add
    pub fn tag(&self) -> String {
        let alias = self.alias.as_deref().map(str::trim).unwrap_or("");
        if alias.is_empty() {
            return ANONYMOUS.to_string();
        }
        match self.emoji.as_deref().map(str::trim) {
            Some(emoji) if !emoji.is_empty() => format!("{} {}", emoji, alias),
            _ => alias.to_string(),
        }
    }
}

// ============================================
// Config Types
// ============================================

/// Menu selector type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectorType {
    #[default]
    Fzf,
    Dialoguer,
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the jukebox server
    pub server_url: String,
    /// Poll period in milliseconds (default: [`DEFAULT_INTERVAL`])
    pub poll_interval_ms: u64,
    /// Initial state of the age-restricted checkbox
    pub allow_age_restricted: bool,
    /// Editor command (default: "nvim")
    pub editor: String,
    /// Menu selector for `history`
    pub selector: SelectorType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".into(),
            poll_interval_ms: DEFAULT_INTERVAL.as_millis() as u64,
            allow_age_restricted: false,
            editor: "nvim".into(),
            selector: SelectorType::default(),
        }
    }
}

// ============================================
// Render Types
// ============================================

/// The three display regions derived from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRegions {
    pub now_playing: NowPlayingRegion,
    pub history: HistoryRegion,
    pub queue: QueueRegion,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NowPlayingRegion {
    Idle {
        message: String,
        controls: Vec<Command>,
    },
    Playing {
        title: String,
        uploader: String,
        progress: SeekSlider,
        elapsed: String,
        total: String,
        /// `/play` when paused, `/pause` otherwise
        toggle: Command,
        skip: Command,
    },
}

impl NowPlayingRegion {
    pub fn slider(&self) -> Option<&SeekSlider> {
        match self {
            NowPlayingRegion::Playing { progress, .. } => Some(progress),
            NowPlayingRegion::Idle { .. } => None,
        }
    }

    pub fn toggle(&self) -> Option<Command> {
        match self {
            NowPlayingRegion::Playing { toggle, .. } => Some(*toggle),
            NowPlayingRegion::Idle { .. } => None,
        }
    }
}

/// Editable position control; any edit becomes a seek
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekSlider {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl SeekSlider {
    /// Seek command for a user edit, clamped to the slider range
    pub fn seek_to(&self, value: f64) -> Command {
        let pos = if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        };
        Command::Seek { pos }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRegion {
    Hidden,
    Visible {
        count_label: String,
        /// Newest first
        entries: Vec<HistoryEntryView>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntryView {
    pub title: String,
    pub meta: String,
    /// History id the replay action is bound to
    pub replay_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueRegion {
    pub count_label: String,
    pub rows: Vec<QueueRow>,
    /// False if a user-added item follows an autoplay item
    pub autoplay_contiguous: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueRow {
    Separator(String),
    Item(QueueEntryView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntryView {
    pub id: String,
    pub title: String,
    pub meta: String,
    pub autoplay: bool,
}

// ============================================
// Selector Types
// ============================================

/// Item displayed in selector menu
#[derive(Debug, Clone)]
pub struct MenuItem<T> {
    /// Display text
    pub label: String,
    /// Underlying value
    pub value: T,
}
