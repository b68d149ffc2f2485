//! Interactive text menu.
//!
//! The menu reads lines from any `BufRead` and writes to any `Write`, so
//! the whole dialogue can be scripted in tests. Malformed input is
//! re-prompted until it parses; end of input ends the session as if the
//! user had chosen to exit.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::{debug, warn};

use super::input::{self, InputError};
use super::render;
use crate::codec;
use crate::core::Session;
use crate::domain::{
    is_affirmative, Collection, RecordId, SearchQuery, StatusOutcome, StatusProposal, ToggleOutcome,
};

const RULE_WIDTH: usize = 84;

/// Menu entries, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddRecord,
    DeleteRecord,
    Search,
    ListAll,
    ToggleStatus,
    SetStatus,
    SwitchCollection,
    CreateCollection,
    DeleteCollection,
    Exit,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::AddRecord,
        Action::DeleteRecord,
        Action::Search,
        Action::ListAll,
        Action::ToggleStatus,
        Action::SetStatus,
        Action::SwitchCollection,
        Action::CreateCollection,
        Action::DeleteCollection,
        Action::Exit,
    ];

    /// Menu number of this action
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|a| *a == self).map_or(0, |i| i + 1)
    }

    /// Action for a 1-based menu number
    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::AddRecord => "ADD a record",
            Action::DeleteRecord => "DELETE a record",
            Action::Search => "SEARCH records",
            Action::ListAll => "LIST all records",
            Action::ToggleStatus => "Toggle record STATUS (available / checked-out)",
            Action::SetStatus => "SET a custom record STATUS",
            Action::SwitchCollection => "SWITCH collection",
            Action::CreateCollection => "CREATE a collection",
            Action::DeleteCollection => "DELETE a collection",
            Action::Exit => "SAVE and exit",
        }
    }

    /// Actions that pick a record by id show the listing first
    fn needs_listing(self) -> bool {
        matches!(
            self,
            Action::DeleteRecord | Action::ToggleStatus | Action::SetStatus
        )
    }
}

/// Whether the menu keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The interactive loop over a [`Session`]
pub struct Menu<R, W> {
    input: R,
    output: W,
    last_action: Option<Action>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            last_action: None,
        }
    }

    /// Give back the writer, e.g. to inspect scripted output
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self, session: &mut Session) -> Result<()> {
        if session.is_empty() {
            writeln!(self.output, "[INFO] There are no collections yet")?;
            if self.create_collection(session)? == Flow::Quit {
                return Ok(());
            }
        }

        loop {
            self.print_menu(session)?;

            let Some(choice) = self.ask(">>> ", |line| input::parse_choice(line, Action::ALL.len()))?
            else {
                self.warn_if_unsaveable(session)?;
                break;
            };
            let Some(action) = Action::from_number(choice) else {
                continue;
            };
            debug!(?action, "Menu choice");

            if action.needs_listing() && self.last_action != Some(Action::ListAll) {
                self.list_all(session)?;
            }

            let flow = match action {
                Action::AddRecord => self.add_record(session)?,
                Action::DeleteRecord => self.delete_record(session)?,
                Action::Search => self.search(session)?,
                Action::ListAll => self.list_all(session)?,
                Action::ToggleStatus => self.toggle_status(session)?,
                Action::SetStatus => self.set_status(session)?,
                Action::SwitchCollection => self.switch_collection(session)?,
                Action::CreateCollection => self.create_collection(session)?,
                Action::DeleteCollection => self.delete_collection(session)?,
                Action::Exit => self.exit(session)?,
            };

            if flow == Flow::Quit {
                if action != Action::Exit {
                    self.warn_if_unsaveable(session)?;
                }
                break;
            }
            self.last_action = Some(action);
        }

        Ok(())
    }

    fn print_menu(&mut self, session: &Session) -> Result<()> {
        writeln!(self.output, "{:=^width$}", " MENU ", width = RULE_WIDTH)?;
        if let Some(current) = session.current() {
            writeln!(self.output, "[INFO] Working with collection '{}'", current.name())?;
        }
        writeln!(self.output, "Enter the number of an action:")?;
        for action in Action::ALL {
            writeln!(self.output, "{} - {}", action.number(), action.description())?;
        }
        writeln!(self.output, "{:=^width$}", "", width = RULE_WIDTH)?;
        Ok(())
    }

    fn add_record(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "[INFO] Adding a record:")?;
        let Some(new) = self.ask(
            "Enter title, author and year separated by ', ' or ','\n>>> ",
            input::parse_record_input,
        )?
        else {
            return Ok(Flow::Quit);
        };

        let collection = current_mut(session)?;
        let record = collection.add(new.title, new.author, new.year);
        writeln!(self.output, "[INFO] '{}' added", record)?;
        Ok(Flow::Continue)
    }

    fn delete_record(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "[INFO] Deleting a record:")?;
        let Some(id) = self.ask_record_id()? else {
            return Ok(Flow::Quit);
        };

        match current_mut(session)?.delete(id) {
            Ok(record) => writeln!(self.output, "[INFO] '{}' deleted", record)?,
            Err(e) => self.warn(e)?,
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "[INFO] Searching records:")?;
        let Some(title) = self.read_line("Enter a title, or nothing to skip the title\n>>> ")? else {
            return Ok(Flow::Quit);
        };
        let Some(author) = self.read_line("Enter an author, or nothing to skip the author\n>>> ")? else {
            return Ok(Flow::Quit);
        };
        let Some(year) = self.ask(
            "Enter a year, or nothing to skip the year\n>>> ",
            input::parse_optional_year,
        )?
        else {
            return Ok(Flow::Quit);
        };

        let query = SearchQuery {
            title: input::optional_text(&title),
            author: input::optional_text(&author),
            year,
        };
        if query.is_empty() {
            writeln!(self.output, "[WARNING] Nothing to search for")?;
            return Ok(Flow::Continue);
        }

        render::write_search(&mut self.output, current(session)?, &query)?;
        Ok(Flow::Continue)
    }

    fn list_all(&mut self, session: &mut Session) -> Result<Flow> {
        render::write_records(&mut self.output, current(session)?)?;
        Ok(Flow::Continue)
    }

    fn toggle_status(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "[INFO] Changing record status:")?;
        let Some(id) = self.ask_record_id()? else {
            return Ok(Flow::Quit);
        };

        let collection = current_mut(session)?;
        let Some(record) = collection.get_mut(id) else {
            return self.record_missing(collection, id);
        };

        match record.toggle_status() {
            ToggleOutcome::Toggled => writeln!(self.output, "[INFO] Status changed:")?,
            ToggleOutcome::NonCanonical => writeln!(
                self.output,
                "[WARNING] The record has a custom status. Nothing changed"
            )?,
        }
        writeln!(self.output, "[INFO] {}", record)?;
        Ok(Flow::Continue)
    }

    fn set_status(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "[INFO] Setting record status:")?;
        let Some(id) = self.ask_record_id()? else {
            return Ok(Flow::Quit);
        };

        let collection = current_mut(session)?;
        if !collection.contains(id) {
            return self.record_missing(collection, id);
        }

        let Some(status) = self.ask("Enter the new status\n>>> ", input::parse_label_text)? else {
            return Ok(Flow::Quit);
        };
        let Some(record) = collection.get_mut(id) else {
            return self.record_missing(collection, id);
        };

        let outcome = match record.propose_status(status.as_str()) {
            StatusProposal::Applied => StatusOutcome::Set,
            StatusProposal::Blank => StatusOutcome::Blank,
            StatusProposal::NeedsConfirmation(pending) => {
                writeln!(
                    self.output,
                    "[WARNING] '{}' is not a standard status\n\
                     Confirm - empty input/Y/y\n\
                     Cancel - anything else",
                    pending.candidate()
                )?;
                match self.read_line(">>> ")? {
                    Some(answer) => pending.confirm(&answer),
                    None => return Ok(Flow::Quit),
                }
            }
        };

        match outcome {
            StatusOutcome::Set | StatusOutcome::Confirmed => {
                writeln!(self.output, "[INFO] Status '{}' set", status)?
            }
            StatusOutcome::Declined => writeln!(self.output, "[INFO] Status not changed")?,
            StatusOutcome::Blank => writeln!(self.output, "[WARNING] Status must not be empty")?,
        }
        Ok(Flow::Continue)
    }

    fn switch_collection(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "[INFO] Choosing a collection:")?;
        let Some(index) = self.ask_collection_index(session, "Enter the collection number\n>>> ")?
        else {
            return Ok(Flow::Quit);
        };

        session.switch_to(index)?;
        Ok(Flow::Continue)
    }

    fn create_collection(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "[INFO] Creating a collection:")?;
        loop {
            let Some(name) = self.ask("Enter the name of the new collection\n>>> ", input::parse_label_text)?
            else {
                return Ok(Flow::Quit);
            };

            match session.create(name) {
                Ok(collection) => {
                    writeln!(self.output, "[INFO] Collection '{}' created", collection.name())?;
                    return Ok(Flow::Continue);
                }
                Err(e) => self.warn(e)?,
            }
        }
    }

    fn delete_collection(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "[INFO] Choosing a collection:")?;
        let Some(index) =
            self.ask_collection_index(session, "Enter the number of the collection to delete\n>>> ")?
        else {
            return Ok(Flow::Quit);
        };

        writeln!(
            self.output,
            "[WARNING] You are deleting collection '{}'\n\
             Confirm - empty input/Y/y\n\
             Cancel - anything else",
            session.collections()[index].name()
        )?;
        let Some(answer) = self.read_line(">>> ")? else {
            return Ok(Flow::Quit);
        };

        match session.delete(index, |_| is_affirmative(&answer))? {
            Some(removed) => writeln!(self.output, "[INFO] {} deleted", removed)?,
            None => {
                writeln!(self.output, "[INFO] Collection not deleted")?;
                return Ok(Flow::Continue);
            }
        }

        if session.is_empty() {
            writeln!(self.output, "[WARNING] No collections left")?;
            return self.create_collection(session);
        }
        Ok(Flow::Continue)
    }

    fn exit(&mut self, session: &mut Session) -> Result<Flow> {
        // Refuse to leave with data that cannot be written back
        if let Err(e) = codec::encode(session.collections()) {
            writeln!(self.output, "[ERROR] Cannot save: {}. Fix it and exit again", e)?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "[INFO] Finishing")?;
        Ok(Flow::Quit)
    }

    fn warn_if_unsaveable(&mut self, session: &Session) -> Result<()> {
        if let Err(e) = codec::encode(session.collections()) {
            writeln!(
                self.output,
                "[ERROR] Input ended but the catalog cannot be saved: {}. The file stays as it was",
                e
            )?;
        }
        Ok(())
    }

    fn ask_record_id(&mut self) -> Result<Option<RecordId>> {
        self.ask("Enter the record number\n>>> ", input::parse_number::<RecordId>)
    }

    fn ask_collection_index(&mut self, session: &Session, prompt: &str) -> Result<Option<usize>> {
        render::write_collections(&mut self.output, session.collections())?;
        let count = session.len();
        let choice = self.ask(prompt, |line| input::parse_choice(line, count))?;
        Ok(choice.map(|number| number - 1))
    }

    fn record_missing(&mut self, collection: &Collection, id: RecordId) -> Result<Flow> {
        warn!(collection = %collection.name(), id, "Record not found");
        writeln!(
            self.output,
            "[WARNING] There is no record number {} in this collection",
            id
        )?;
        Ok(Flow::Continue)
    }

    fn warn(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "[WARNING] {}", message)?;
        Ok(())
    }

    /// Prompt until `parse` accepts the line. `None` at end of input.
    fn ask<T, F>(&mut self, prompt: &str, parse: F) -> Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, InputError>,
    {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "[WARNING] {}. Please try again", e)?,
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("End of input");
            return Ok(None);
        }

        let line = line.trim_end_matches(['\r', '\n']).to_string();
        debug!(input = %line, "Read");
        Ok(Some(line))
    }
}

fn current(session: &Session) -> Result<&Collection> {
    session
        .current()
        .ok_or_else(|| anyhow::anyhow!("No collection is selected"))
}

fn current_mut(session: &mut Session) -> Result<&mut Collection> {
    session
        .current_mut()
        .ok_or_else(|| anyhow::anyhow!("No collection is selected"))
}
