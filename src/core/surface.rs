//! Seams between the sync core and whatever displays its output

use crate::types::{RenderedRegions, UserIdentity};

/// Display target for rendered regions and user-visible errors
pub trait Surface: Send + Sync {
    /// Replace everything shown with `regions`
    fn render(&self, regions: &RenderedRegions);

    /// Show a dismissable error
    fn alert(&self, message: &str);
}

/// User-manipulated inputs, read at the moment a command is built
pub trait Controls: Send + Sync {
    /// State of the "allow age-restricted" checkbox
    fn allow_age_restricted(&self) -> bool;

    /// Locally persisted identity; read-only from the core
    fn identity(&self) -> UserIdentity;
}
