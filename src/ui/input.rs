//! Line commands typed during `watch`

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Add { query: String, play_next: bool },
    Play,
    Pause,
    /// Whatever the rendered toggle is bound to
    Toggle,
    Skip,
    Seek(f64),
    Replay(String),
    ToggleAgeRestricted,
    /// Clear alerts and notices kept on screen
    Dismiss,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add <query>     (a)  queue a search at the end
  next <query>    (n)  queue a search to play next
  play            (p)  resume
  pause                pause
  toggle          (t)  play/pause, as shown
  skip            (s)  skip current song
  seek <seconds>       jump within current song
  replay <id>     (r)  search a history entry again
  age                  allow/disallow age-restricted results
  dismiss         (d)  clear messages below the queue
  help            (h)  this text
  quit            (q)  exit";

/// Parse a line; `Err` carries a message for the user, `Ok(None)` is a blank line
pub fn parse(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_lowercase().as_str() {
        "add" | "a" => Input::Add {
            query: rest.to_string(),
            play_next: false,
        },
        "next" | "n" => Input::Add {
            query: rest.to_string(),
            play_next: true,
        },
        "play" | "p" => Input::Play,
        "pause" => Input::Pause,
        "toggle" | "t" => Input::Toggle,
        "skip" | "s" => Input::Skip,
        "seek" => {
            let pos = parse_position(rest).ok_or_else(|| {
                format!("seek needs a position in seconds or M:SS, got {:?}", rest)
            })?;
            Input::Seek(pos)
        }
        "replay" | "r" => {
            if rest.is_empty() {
                return Err("replay needs a history id".into());
            }
            Input::Replay(rest.to_string())
        }
        "age" => Input::ToggleAgeRestricted,
        "dismiss" | "d" => Input::Dismiss,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => return Err(format!("unknown command {:?} (try help)", other)),
    };

    Ok(Some(input))
}

/// Seconds as `90`, `90.5` or `1:30`
pub fn parse_position(text: &str) -> Option<f64> {
    let text = text.trim();
    let value = match text.split_once(':') {
        Some((mins, secs)) => {
            let mins: u64 = mins.parse().ok()?;
            let secs: f64 = secs.parse().ok()?;
            if !(0.0..60.0).contains(&secs) {
                return None;
            }
            mins as f64 * 60.0 + secs
        }
        None => text.parse().ok()?,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}
