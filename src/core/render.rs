//! Snapshot to display regions
//!
//! Every call derives all three regions from scratch; nothing is diffed
//! against an earlier render, so the same snapshot always renders the same.

use crate::core::time::format_time;
use crate::types::{
    ANONYMOUS, Command, HistoryEntryView, HistoryItem, HistoryRegion, NowPlaying,
    NowPlayingRegion, QueueEntryView, QueueItem, QueueRegion, QueueRow, RenderedRegions,
    SeekSlider, Snapshot,
};

pub const IDLE_MESSAGE: &str = "Nothing playing";
pub const AUTOPLAY_SEPARATOR: &str = "🎵 Auto-suggested songs";
const AUTOPLAY_LABEL: &str = "Auto-suggested";

/// Render a snapshot: now playing, then history, then queue
pub fn render(snapshot: &Snapshot) -> RenderedRegions {
    RenderedRegions {
        now_playing: render_now_playing(snapshot.now.as_ref()),
        history: render_history(&snapshot.history),
        queue: render_queue(&snapshot.queue),
    }
}

pub fn render_now_playing(now: Option<&NowPlaying>) -> NowPlayingRegion {
    let Some(now) = now else {
        return NowPlayingRegion::Idle {
            message: IDLE_MESSAGE.to_string(),
            controls: vec![Command::Play, Command::Skip],
        };
    };

    let duration = non_negative(now.duration);
    // The server reads position from the player and can overshoot
    let position = non_negative(now.position).min(duration);

    NowPlayingRegion::Playing {
        title: now.title.clone(),
        uploader: now.uploader.clone(),
        progress: SeekSlider {
            min: 0.0,
            max: duration,
            value: position,
        },
        elapsed: format_time(position),
        total: format_time(duration),
        toggle: if now.paused {
            Command::Play
        } else {
            Command::Pause
        },
        skip: Command::Skip,
    }
}

pub fn render_history(history: &[HistoryItem]) -> HistoryRegion {
    if history.is_empty() {
        return HistoryRegion::Hidden;
    }

    let entries = history
        .iter()
        .rev()
        .map(|item| HistoryEntryView {
            title: item.title.clone(),
            meta: track_meta(item),
            replay_id: item.id.clone(),
        })
        .collect();

    HistoryRegion::Visible {
        count_label: count_label(history.len()),
        entries,
    }
}

/// Queue rows in play order, with one separator before the first autoplay item
///
/// Autoplay items are expected at the tail. The separator latches on the first
/// one; a user item after it does not get a second separator, it only clears
/// `autoplay_contiguous`.
pub fn render_queue(queue: &[QueueItem]) -> QueueRegion {
    let mut rows = Vec::with_capacity(queue.len() + 1);
    let mut autoplay_started = false;
    let mut autoplay_contiguous = true;

    for item in queue {
        let autoplay = item.is_autoplay();
        if autoplay && !autoplay_started {
            rows.push(QueueRow::Separator(AUTOPLAY_SEPARATOR.to_string()));
            autoplay_started = true;
        } else if !autoplay && autoplay_started {
            autoplay_contiguous = false;
        }

        let added_by = if autoplay {
            AUTOPLAY_LABEL
        } else {
            item.added_by
                .as_deref()
                .filter(|by| !by.is_empty())
                .unwrap_or(ANONYMOUS)
        };

        rows.push(QueueRow::Item(QueueEntryView {
            id: item.id.clone(),
            title: item.title.clone(),
            meta: format!("{} • {}", track_meta(item), added_by),
            autoplay,
        }));
    }

    QueueRegion {
        count_label: count_label(queue.len()),
        rows,
        autoplay_contiguous,
    }
}

/// "uploader • M:SS", duration left out when unknown or zero
fn track_meta(item: &QueueItem) -> String {
    match item.duration.filter(|d| *d > 0.0) {
        Some(duration) => format!("{} • {}", item.uploader, format_time(duration)),
        None => item.uploader.clone(),
    }
}

fn count_label(count: usize) -> String {
    format!("{} songs", count)
}

fn non_negative(seconds: f64) -> f64 {
    if seconds.is_nan() { 0.0 } else { seconds.max(0.0) }
}
