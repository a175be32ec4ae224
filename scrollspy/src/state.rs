/// Remembered scroll state used to infer the scroll direction between batches.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`, so hosts can carry it
/// across page reloads along with the container's scroll offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMemory {
    /// `offset_top` of the last activated section.
    pub visible_entry_top: f64,
    /// Container scroll offset at the end of the last processed batch.
    pub parent_scroll_top: f64,
}

impl ScrollMemory {
    pub fn scrolls_down(&self, scroll_top: f64) -> bool {
        scroll_top >= self.parent_scroll_top
    }

    pub fn is_lower(&self, offset_top: f64) -> bool {
        offset_top >= self.visible_entry_top
    }
}
