//! fzf picker

use crate::error::{JukeboxError, Result};
use crate::types::MenuItem;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

pub struct FzfSelector;

impl FzfSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick one item; order is preserved, cancel is `NoSelection`
    pub fn pick<T: Clone>(&self, items: &[MenuItem<T>], prompt: &str) -> Result<T> {
        if items.is_empty() {
            return Err(JukeboxError::NoSelection);
        }

        // Index prefix lets us map the chosen line back without matching labels
        let input: String = items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}\t{}", i, item.label))
            .collect::<Vec<_>>()
            .join("\n");

        let mut child = Command::new("fzf")
            .args([
                "--prompt", &format!("{} > ", prompt),
                "--height", "40%",
                "--reverse",
                "--no-sort",
                "--ansi",
                "--delimiter", "\t",
                "--with-nth", "2..",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| JukeboxError::Spawn(format!("Failed to start fzf: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            debug!(code = ?output.status.code(), "fzf cancelled");
            return Err(JukeboxError::NoSelection);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .split('\t')
            .next()
            .and_then(|index| index.parse::<usize>().ok())
            .and_then(|index| items.get(index))
            .map(|item| item.value.clone())
            .ok_or(JukeboxError::NoSelection)
    }

    pub fn is_available(&self) -> bool {
        Command::new("which")
            .arg("fzf")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}
