//! dialoguer picker (fallback when fzf is missing)

use crate::error::{JukeboxError, Result};
use crate::types::MenuItem;
use dialoguer::{Select, theme::ColorfulTheme};

pub struct DialoguerSelector;

impl DialoguerSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick one item; Esc or q is `NoSelection`
    pub fn pick<T: Clone>(&self, items: &[MenuItem<T>], prompt: &str) -> Result<T> {
        if items.is_empty() {
            return Err(JukeboxError::NoSelection);
        }

        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(|e| JukeboxError::Spawn(format!("Terminal prompt failed: {}", e)))?
            .ok_or(JukeboxError::NoSelection)?;

        items
            .get(selection)
            .map(|item| item.value.clone())
            .ok_or(JukeboxError::NoSelection)
    }
}
