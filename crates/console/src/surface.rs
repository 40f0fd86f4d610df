//! Presentation surface boundary.

use stockroom_inventory::{InventoryItem, ItemForm};

/// What the view binder needs from whatever shows the inventory to a user.
///
/// Rows are addressed by position; per-row edit/delete actions are expressed
/// by calling the binder with that position.
pub trait PresentationSurface {
    /// Replace the displayed rows with `items` (full re-render).
    fn render(&mut self, items: &[InventoryItem]);

    /// Current raw form values.
    fn read_form(&self) -> ItemForm;

    fn fill_form(&mut self, form: &ItemForm);

    fn clear_form(&mut self);

    /// Ask the user a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Tell the user something went wrong.
    fn notify(&mut self, message: &str);
}
