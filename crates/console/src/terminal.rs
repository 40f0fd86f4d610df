//! Line-oriented terminal presentation surface.

use std::io::{self, BufRead, Write};

use stockroom_inventory::{AuditEntry, FormField, InventoryItem, ItemForm};

use crate::surface::PresentationSurface;

const HEADERS: [&str; 8] = [
    "#", "Product", "SKU", "Category", "Qty", "Supplier", "Price", "Location",
];

/// Answer that empties a form field instead of keeping its current value.
pub const CLEAR_FIELD: &str = "-";

/// Terminal surface over any line reader and writer.
///
/// The form lives here (like a form on a page); [`TerminalSurface::prompt_form`]
/// lets the user edit it field by field. Rows are shown numbered from 1.
#[derive(Debug)]
pub struct TerminalSurface<R, W> {
    input: R,
    output: W,
    form: ItemForm,
}

impl<R, W> TerminalSurface<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            form: ItemForm::default(),
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line without its line ending; `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Write `text` without a newline and flush, for inline prompts.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Ask for every field in turn; an empty answer keeps the current value and
    /// [`CLEAR_FIELD`] empties it.
    ///
    /// Returns `false` if input ended before the form was complete.
    pub fn prompt_form(&mut self) -> io::Result<bool> {
        for field in FormField::ALL {
            let current = self.form.get(field).to_string();
            if current.is_empty() {
                self.prompt(&format!("{}: ", field.label()))?;
            } else {
                self.prompt(&format!("{} [{}]: ", field.label(), current))?;
            }

            let Some(answer) = self.read_line()? else {
                return Ok(false);
            };
            match answer.trim() {
                "" => {}
                CLEAR_FIELD => self.form.set(field, ""),
                _ => self.form.set(field, answer),
            }
        }
        Ok(true)
    }

    pub fn print_audit_trail(&mut self, entries: &[AuditEntry]) -> io::Result<()> {
        if entries.is_empty() {
            return self.write_line("No audit records found.");
        }
        for entry in entries {
            writeln!(
                self.output,
                "{} {:<6} {} {}",
                entry.timestamp.to_rfc3339(),
                entry.action,
                entry.sku,
                entry.details
            )?;
        }
        Ok(())
    }

    pub fn print_deleted(&mut self, items: &[InventoryItem]) -> io::Result<()> {
        if items.is_empty() {
            return self.write_line("No deleted items.");
        }
        self.write_table(items)
    }

    fn write_table(&mut self, items: &[InventoryItem]) -> io::Result<()> {
        let rows: Vec<[String; 8]> = items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                [
                    (position + 1).to_string(),
                    item.product_name.clone(),
                    item.sku.clone(),
                    item.category.clone(),
                    item.quantity.to_string(),
                    item.supplier.clone(),
                    item.price.to_string(),
                    item.location.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header = HEADERS.map(String::from);
        for row in std::iter::once(&header).chain(&rows) {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(self.output, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

impl<R, W> PresentationSurface for TerminalSurface<R, W>
where
    R: BufRead,
    W: Write,
{
    fn render(&mut self, items: &[InventoryItem]) {
        let result = if items.is_empty() {
            self.write_line("No items in inventory.")
        } else {
            self.write_table(items)
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to render inventory");
        }
    }

    fn read_form(&self) -> ItemForm {
        self.form.clone()
    }

    fn fill_form(&mut self, form: &ItemForm) {
        self.form = form.clone();
    }

    fn clear_form(&mut self) {
        self.form.clear();
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if let Err(err) = self.prompt(&format!("{prompt} (yes/no): ")) {
            tracing::warn!(error = %err, "failed to show confirmation prompt");
            return false;
        }
        match self.read_line() {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y"),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read confirmation");
                false
            }
        }
    }

    fn notify(&mut self, message: &str) {
        if let Err(err) = self.write_line(&format!("Error: {message}")) {
            tracing::warn!(error = %err, "failed to show notification");
        }
    }
}
