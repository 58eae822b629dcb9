//! Picker used by `jukebox history`

use super::dialoguer_selector::DialoguerSelector;
use super::fzf::FzfSelector;
use crate::error::Result;
use crate::types::{MenuItem, SelectorType};
use tracing::debug;

/// Interactive single-choice menu
pub enum Selector {
    Fzf(FzfSelector),
    Dialoguer(DialoguerSelector),
}

impl Selector {
    pub fn pick<T: Clone>(&self, items: &[MenuItem<T>], prompt: &str) -> Result<T> {
        match self {
            Selector::Fzf(s) => s.pick(items, prompt),
            Selector::Dialoguer(s) => s.pick(items, prompt),
        }
    }
}

/// Create the configured selector, falling back to dialoguer without fzf
pub fn create_selector(selector_type: SelectorType) -> Selector {
    match selector_type {
        SelectorType::Fzf => {
            let fzf = FzfSelector::new();
            if fzf.is_available() {
                return Selector::Fzf(fzf);
            }
            debug!("fzf not found, using dialoguer");
            Selector::Dialoguer(DialoguerSelector::new())
        }
        SelectorType::Dialoguer => Selector::Dialoguer(DialoguerSelector::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JukeboxError;

    #[test]
    fn test_empty_menu_is_no_selection() {
        let items: Vec<MenuItem<String>> = Vec::new();
        let selector = create_selector(SelectorType::Dialoguer);
        assert!(matches!(
            selector.pick(&items, "Replay"),
            Err(JukeboxError::NoSelection)
        ));
    }
}
