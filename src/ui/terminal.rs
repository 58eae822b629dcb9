//! Terminal display surface and controls

use crate::core::surface::{Controls, Surface};
use crate::storage::identity::load_identity;
use crate::types::{
    HistoryRegion, NowPlayingRegion, QueueRegion, QueueRow, RenderedRegions, SeekSlider,
    UserIdentity,
};
use chrono::Local;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::warn;

const BAR_WIDTH: usize = 30;

/// How long an alert or notice stays under the regions
pub const NOTICE_TTL: Duration = Duration::from_secs(10);
const MAX_NOTICES: usize = 5;

/// A message kept on screen across redraws
#[derive(Debug, Clone)]
struct Notice {
    text: String,
    alert: bool,
    posted: Instant,
}

/// Prints regions to stdout and remembers the last one applied
///
/// When clearing, alerts and notices are printed again below every render
/// until they expire or are dismissed.
pub struct TerminalSurface {
    /// Clear the screen before each render (watch mode)
    clear: bool,
    notice_ttl: Duration,
    last: Mutex<Option<RenderedRegions>>,
    notices: Mutex<Vec<Notice>>,
}

impl TerminalSurface {
    pub fn new(clear: bool) -> Self {
        Self {
            clear,
            notice_ttl: NOTICE_TTL,
            last: Mutex::new(None),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    /// Regions currently on screen, if any render happened
    pub fn current(&self) -> Option<RenderedRegions> {
        self.last.lock().ok().and_then(|last| last.clone())
    }

    /// Show a non-error message, such as help text or an input mistake
    pub fn notify(&self, message: &str) {
        println!("{}", message);
        self.keep(message, false);
    }

    /// Drop every pending alert and notice
    pub fn dismiss(&self) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.clear();
        }
    }

    /// Lines a render of `regions` shows, pending notices included
    pub fn screen(&self, regions: &RenderedRegions) -> Vec<String> {
        let mut lines = format_regions(regions);
        let notices = self.pending_notices();
        if !notices.is_empty() {
            lines.push(String::new());
            lines.extend(notices);
        }
        lines
    }

    fn keep(&self, text: &str, alert: bool) {
        if !self.clear {
            return;
        }
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                text: text.to_string(),
                alert,
                posted: Instant::now(),
            });
            let overflow = notices.len().saturating_sub(MAX_NOTICES);
            notices.drain(..overflow);
        }
    }

    /// Unexpired notices as display lines, oldest first; expired ones are dropped
    fn pending_notices(&self) -> Vec<String> {
        let Ok(mut notices) = self.notices.lock() else {
            return Vec::new();
        };
        let ttl = self.notice_ttl;
        notices.retain(|notice| notice.posted.elapsed() < ttl);

        notices
            .iter()
            .flat_map(|notice| {
                notice.text.lines().map(move |line| {
                    if notice.alert {
                        line.red().bold().to_string()
                    } else {
                        line.to_string()
                    }
                })
            })
            .collect()
    }
}

impl Surface for TerminalSurface {
    fn render(&self, regions: &RenderedRegions) {
        if !regions.queue.autoplay_contiguous {
            warn!("queue has user-added songs after auto-suggested ones");
        }

        let lines = self.screen(regions);
        let mut out = std::io::stdout().lock();
        if self.clear {
            // Clear screen, cursor home
            let _ = write!(out, "\x1b[2J\x1b[H");
        }
        let _ = writeln!(
            out,
            "{}",
            format!("Jukebox · updated {}", Local::now().format("%H:%M:%S")).dimmed()
        );
        for line in lines {
            let _ = writeln!(out, "{}", line);
        }
        let _ = out.flush();

        if let Ok(mut last) = self.last.lock() {
            *last = Some(regions.clone());
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message.red().bold());
        self.keep(message, true);
    }
}

/// Render regions as display lines
pub fn format_regions(regions: &RenderedRegions) -> Vec<String> {
    let mut lines = Vec::new();
    format_now_playing(&regions.now_playing, &mut lines);
    format_history(&regions.history, &mut lines);
    format_queue(&regions.queue, &mut lines);
    lines
}

fn format_now_playing(region: &NowPlayingRegion, lines: &mut Vec<String>) {
    lines.push(String::new());
    match region {
        NowPlayingRegion::Idle { message, controls } => {
            lines.push(message.italic().to_string());
            let labels: Vec<&str> = controls.iter().map(|c| c.endpoint()).collect();
            lines.push(format!("  [{}]", labels.join("] [")).dimmed().to_string());
        }
        NowPlayingRegion::Playing {
            title,
            uploader,
            progress,
            elapsed,
            total,
            toggle,
            skip,
        } => {
            lines.push(format!("▶ {}", title.bold()));
            lines.push(format!("  {}", uploader.cyan()));
            lines.push(format!("  {} {} {}", elapsed, progress_bar(progress), total));
            lines.push(
                format!("  [{}] [{}]", toggle.endpoint(), skip.endpoint())
                    .dimmed()
                    .to_string(),
            );
        }
    }
}

fn format_history(region: &HistoryRegion, lines: &mut Vec<String>) {
    let HistoryRegion::Visible {
        count_label,
        entries,
    } = region
    else {
        return;
    };

    lines.push(String::new());
    lines.push(format!("{} ({})", "History".bold(), count_label));
    for entry in entries {
        lines.push(format!(
            "  ↺ {} {} {}",
            entry.title,
            format!("- {}", entry.meta).dimmed(),
            format!("[{}]", entry.replay_id).yellow()
        ));
    }
}

fn format_queue(region: &QueueRegion, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push(format!("{} ({})", "Queue".bold(), region.count_label));
    for row in &region.rows {
        match row {
            QueueRow::Separator(label) => {
                lines.push(format!("  ── {} ──", label).dimmed().to_string());
            }
            QueueRow::Item(item) => {
                let icon = if item.autoplay { "♫" } else { "•" };
                let title = if item.autoplay {
                    item.title.dimmed().to_string()
                } else {
                    item.title.clone()
                };
                let meta = format!("- {}", item.meta).dimmed();
                lines.push(format!("  {} {} {}", icon, title, meta));
            }
        }
    }
}

fn progress_bar(slider: &SeekSlider) -> String {
    let filled = if slider.max > 0.0 {
        ((slider.value / slider.max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "=".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Age-restricted checkbox plus the identity read from disk
pub struct TerminalControls {
    allow_age_restricted: AtomicBool,
    identity_path: PathBuf,
    identity: Mutex<UserIdentity>,
}

impl TerminalControls {
    pub async fn load(allow_age_restricted: bool, identity_path: PathBuf) -> Self {
        let identity = load_identity(&identity_path).await;
        Self {
            allow_age_restricted: AtomicBool::new(allow_age_restricted),
            identity_path,
            identity: Mutex::new(identity),
        }
    }

    /// Re-read the identity file, picking up `jukebox identity` changes
    pub async fn reload_identity(&self) {
        let identity = load_identity(&self.identity_path).await;
        if let Ok(mut current) = self.identity.lock() {
            *current = identity;
        }
    }

    /// Flip the checkbox; returns the new state
    pub fn toggle_age_restricted(&self) -> bool {
        !self.allow_age_restricted.fetch_xor(true, Ordering::SeqCst)
    }
}

impl Controls for TerminalControls {
    fn allow_age_restricted(&self) -> bool {
        self.allow_age_restricted.load(Ordering::SeqCst)
    }

    fn identity(&self) -> UserIdentity {
        self.identity
            .lock()
            .map(|identity| identity.clone())
            .unwrap_or_default()
    }
}
