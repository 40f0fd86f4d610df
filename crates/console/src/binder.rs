//! View binder: translates form input into store operations and tracks edit mode.

use stockroom_core::{DomainError, DomainResult};
use stockroom_infra::{InventoryStore, KeyValueStore, StoreError};
use stockroom_inventory::{InventoryItem, ItemForm};

use crate::surface::PresentationSurface;

/// Prompt shown before an item is removed.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this item?";

/// Pending edit target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Added { position: usize },
    Updated { position: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(InventoryItem),
    /// The user declined the confirmation; nothing changed.
    Cancelled,
}

/// Owns the store and the surface, and keeps them in step.
///
/// Every successful mutation re-renders the full list exactly once. Failures
/// are reported to the surface and returned; nothing is retried.
#[derive(Debug)]
pub struct ViewBinder<S, P> {
    store: InventoryStore<S>,
    surface: P,
    state: EditState,
}

impl<S, P> ViewBinder<S, P>
where
    S: KeyValueStore,
    P: PresentationSurface,
{
    /// Bind a loaded store to a surface and render the initial rows.
    pub fn new(store: InventoryStore<S>, surface: P) -> Self {
        let mut binder = Self {
            store,
            surface,
            state: EditState::Idle,
        };
        binder.render();
        binder
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn store(&self) -> &InventoryStore<S> {
        &self.store
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    pub fn into_parts(self) -> (InventoryStore<S>, P) {
        (self.store, self.surface)
    }

    /// Re-render the current rows.
    pub fn render(&mut self) {
        self.surface.render(self.store.items());
    }

    /// Parse the surface's form into an item.
    pub fn read_form(&self) -> DomainResult<InventoryItem> {
        self.surface.read_form().parse()
    }

    /// Load the item at `position` into the form and make it the edit target.
    pub fn enter_edit_mode(&mut self, position: usize) -> Result<(), StoreError> {
        let result: Result<(), StoreError> = match self.store.get(position) {
            Some(item) => {
                self.surface.fill_form(&ItemForm::from_item(item));
                self.state = EditState::Editing(position);
                tracing::debug!(position, "entered edit mode");
                Ok(())
            }
            None => Err(DomainError::out_of_range(position, self.store.len()).into()),
        };
        self.report(result)
    }

    /// Add (Idle) or replace the edit target (Editing), then clear the form.
    ///
    /// On failure the form and the edit state are left as they were.
    pub fn submit(&mut self) -> Result<SubmitOutcome, StoreError> {
        let result = self.try_submit();
        self.report(result)
    }

    /// Ask for confirmation, then remove the item at `position`.
    pub fn request_delete(&mut self, position: usize) -> Result<DeleteOutcome, StoreError> {
        let result = self.try_delete(position);
        self.report(result)
    }

    /// Clear the form and drop any pending edit target.
    pub fn reset(&mut self) {
        self.surface.clear_form();
        self.state = EditState::Idle;
    }

    fn try_submit(&mut self) -> Result<SubmitOutcome, StoreError> {
        let item = self.read_form()?;

        let outcome = match self.state {
            EditState::Idle => {
                let position = self.store.add(item)?;
                SubmitOutcome::Added { position }
            }
            EditState::Editing(position) => {
                self.store.replace_at(position, item)?;
                self.state = EditState::Idle;
                SubmitOutcome::Updated { position }
            }
        };

        self.surface.clear_form();
        self.render();
        Ok(outcome)
    }

    fn try_delete(&mut self, position: usize) -> Result<DeleteOutcome, StoreError> {
        if self.store.get(position).is_none() {
            return Err(DomainError::out_of_range(position, self.store.len()).into());
        }

        if !self.surface.confirm(DELETE_PROMPT) {
            tracing::debug!(position, "deletion cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let removed = self.store.remove_at(position)?;

        // Positions after the removed row shifted down by one.
        match self.state {
            EditState::Editing(target) if target == position => self.reset(),
            EditState::Editing(target) if target > position => {
                self.state = EditState::Editing(target - 1);
            }
            _ => {}
        }

        self.render();
        Ok(DeleteOutcome::Deleted(removed))
    }

    fn report<T>(&mut self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if let Err(err) = &result {
            tracing::debug!(error = %err, "action failed");
            self.surface.notify(&err.to_string());
        }
        result
    }
}
