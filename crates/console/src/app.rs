//! Interactive command loop for the terminal surface.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

use stockroom_infra::KeyValueStore;

use crate::binder::{DeleteOutcome, SubmitOutcome, ViewBinder};
use crate::surface::PresentationSurface;
use crate::terminal::TerminalSurface;

pub const HELP: &str = "\
Commands:
  list          show the inventory
  add           fill in the form and add a new item
  edit <row>    edit the item in <row>
  delete <row>  delete the item in <row> (asks for confirmation)
  reset         clear the form and cancel a pending edit
  audit         show the audit trail
  deleted       show deleted items
  help          show this help
  quit          exit

While filling the form, press Enter to keep the value shown in brackets
or type - to clear it.";

/// One parsed user command. Row numbers are already converted to positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Add,
    Edit(usize),
    Delete(usize),
    Reset,
    Audit,
    Deleted,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?} (type `help` for a list)")]
    Unknown(String),

    #[error("`{0}` needs a row number")]
    MissingRow(&'static str),

    #[error("invalid row number {0:?} (rows start at 1)")]
    InvalidRow(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or("").to_ascii_lowercase();

        let command = match verb.as_str() {
            "list" | "ls" => Command::List,
            "add" => Command::Add,
            "edit" => Command::Edit(parse_row(words.next(), "edit")?),
            "delete" | "rm" => Command::Delete(parse_row(words.next(), "delete")?),
            "reset" => Command::Reset,
            "audit" => Command::Audit,
            "deleted" => Command::Deleted,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };
        Ok(command)
    }
}

fn parse_row(raw: Option<&str>, verb: &'static str) -> Result<usize, CommandError> {
    let raw = raw.ok_or(CommandError::MissingRow(verb))?;
    match raw.parse::<usize>() {
        Ok(row) if row >= 1 => Ok(row - 1),
        _ => Err(CommandError::InvalidRow(raw.to_string())),
    }
}

/// Run the command loop until `quit` or end of input.
pub fn run<S, R, W>(binder: &mut ViewBinder<S, TerminalSurface<R, W>>) -> io::Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    loop {
        binder.surface_mut().prompt("> ")?;
        let Some(line) = binder.surface_mut().read_line()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                binder.surface_mut().notify(&err.to_string());
                continue;
            }
        };
        tracing::debug!(?command, "command received");

        match command {
            Command::List => binder.render(),
            Command::Add => {
                binder.reset();
                if !fill_and_submit(binder)? {
                    break;
                }
            }
            Command::Edit(position) => {
                if binder.enter_edit_mode(position).is_ok() && !fill_and_submit(binder)? {
                    break;
                }
            }
            Command::Delete(position) => match binder.request_delete(position) {
                Ok(DeleteOutcome::Deleted(item)) => {
                    binder.surface_mut().write_line(&format!("Item {} deleted.", item.sku))?;
                }
                Ok(DeleteOutcome::Cancelled) => {
                    binder.surface_mut().write_line("Deletion cancelled.")?;
                }
                Err(_) => {}
            },
            Command::Reset => {
                binder.reset();
                binder.surface_mut().write_line("Form cleared.")?;
            }
            Command::Audit => match binder.store().audit_trail() {
                Ok(entries) => binder.surface_mut().print_audit_trail(&entries)?,
                Err(err) => binder.surface_mut().notify(&err.to_string()),
            },
            Command::Deleted => match binder.store().deleted_items() {
                Ok(items) => binder.surface_mut().print_deleted(&items)?,
                Err(err) => binder.surface_mut().notify(&err.to_string()),
            },
            Command::Help => binder.surface_mut().write_line(HELP)?,
            Command::Quit => break,
        }
    }
    Ok(())
}

/// Prompt for the form and submit it. Returns `false` when input ran out.
fn fill_and_submit<S, R, W>(binder: &mut ViewBinder<S, TerminalSurface<R, W>>) -> io::Result<bool>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    if !binder.surface_mut().prompt_form()? {
        return Ok(false);
    }
    match binder.submit() {
        Ok(SubmitOutcome::Added { position }) => {
            binder.surface_mut().write_line(&format!("Item added as row {}.", position + 1))?;
        }
        Ok(SubmitOutcome::Updated { position }) => {
            binder.surface_mut().write_line(&format!("Row {} updated.", position + 1))?;
        }
        // Already reported to the surface; the form keeps its values.
        Err(_) => {}
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use stockroom_infra::{FileKeyValueStore, InMemoryKeyValueStore, InventoryStore};

    use super::*;

    type Surface = TerminalSurface<Cursor<Vec<u8>>, Vec<u8>>;

    fn session<S: KeyValueStore>(kv: S, input: &str) -> (InventoryStore<S>, String) {
        let store = InventoryStore::load(kv).unwrap();
        let input = Cursor::new(input.as_bytes().to_vec());
        let surface: Surface = TerminalSurface::new(input, Vec::new());
        let mut binder = ViewBinder::new(store, surface);

        run(&mut binder).unwrap();

        let (store, surface) = binder.into_parts();
        (store, String::from_utf8(surface.into_output()).unwrap())
    }

    const WIDGET: &str = "Widget\nW1\nHardware\n10\nAcme\n9.99\nA1\n";
    const GADGET: &str = "Gadget\nG1\nHardware\n3\nAcme\n19.5\nB2\n";

    #[test]
    fn parses_commands_and_rows() {
        assert_eq!("list".parse::<Command>().unwrap(), Command::List);
        assert_eq!("  EDIT 2 ".parse::<Command>().unwrap(), Command::Edit(1));
        assert_eq!("rm 1".parse::<Command>().unwrap(), Command::Delete(0));
        assert_eq!("edit".parse::<Command>().unwrap_err(), CommandError::MissingRow("edit"));
        assert_eq!(
            "delete 0".parse::<Command>().unwrap_err(),
            CommandError::InvalidRow("0".to_string())
        );
        assert!(matches!("sync".parse::<Command>(), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn add_then_duplicate_is_refused() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let input = format!("add\n{WIDGET}add\n{WIDGET}quit\n");

        let (store, out) = session(kv, &input);

        assert_eq!(store.len(), 1);
        assert!(out.contains("Item added as row 1."));
        assert!(out.contains("Error: duplicate SKU: W1 already exists"));
    }

    #[test]
    fn edit_updates_row_and_persists() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let input = format!("add\n{WIDGET}add\n{GADGET}edit 1\nWidget Pro\n\n\n\n\n\n\nquit\n");

        let (store, out) = session(kv.clone(), &input);

        assert!(out.contains("Row 1 updated."));
        assert_eq!(store.get(0).unwrap().product_name, "Widget Pro");
        assert_eq!(store.get(1).unwrap().sku, "G1");

        let reloaded = InventoryStore::load(kv).unwrap();
        assert_eq!(reloaded.list(), store.list());
    }

    #[test]
    fn delete_asks_and_archives() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let input =
            format!("add\n{WIDGET}add\n{GADGET}delete 1\nno\ndelete 1\nyes\ndeleted\nquit\n");

        let (store, out) = session(kv, &input);

        assert!(out.contains("Deletion cancelled."));
        assert!(out.contains("Item W1 deleted."));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().sku, "G1");
        assert_eq!(store.deleted_items().unwrap().len(), 1);
    }

    #[test]
    fn bad_numbers_and_rows_are_reported() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let input = "add\nWidget\nW1\nHardware\nten\nAcme\n9.99\nA1\nedit 4\nfrobnicate\nquit\n";

        let (store, out) = session(kv, input);

        assert!(store.is_empty());
        assert!(out.contains("Error: validation failed: quantity must be a whole number"));
        assert!(out.contains("Error: no item at position 3"));
        assert!(out.contains("Error: unknown command \"frobnicate\""));
    }

    #[test]
    fn file_backed_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let open = || FileKeyValueStore::open(dir.path()).unwrap();

        let (_, first) = session(open(), &format!("add\n{WIDGET}add\n{GADGET}quit\n"));
        assert!(first.starts_with("No items in inventory.\n"));

        let (store, second) = session(open(), "edit 2\n\n\n-\n\n\n\n\nquit\n");

        assert!(second.contains("1  Widget"));
        assert!(second.contains("Row 2 updated."));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().category, "");
        assert_eq!(store.deleted_items().unwrap().len(), 0);
        assert_eq!(store.audit_trail().unwrap().len(), 3);
    }

    #[test]
    fn end_of_input_mid_form_stops_cleanly() {
        let kv = Arc::new(InMemoryKeyValueStore::new());

        let (store, _) = session(kv, "add\nWidget\n");

        assert!(store.is_empty());
    }

    #[test]
    fn audit_lists_mutations() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let input = format!("audit\nadd\n{WIDGET}audit\nquit\n");

        let (_, out) = session(kv, &input);

        assert!(out.contains("No audit records found."));
        assert!(out.contains("add    W1"));
    }
}
