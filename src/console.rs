//! Interactive command session
//!
//! Reads one line at a time from a [`ConsoleIo`], so the same loop drives a
//! terminal and a scripted test.

use crate::filter::{Criterion, Query};
use crate::model::{FieldName, Reference, ReferenceKind};
use crate::store::{ReferenceLoader, ReferenceSink};
use crate::{Config, Error};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

/// Lines printed by the `help` command
pub const HELP: [&str; 6] = [
    "Available commands:",
    " add - Add a new reference",
    " list - List all references",
    " filter - Filter references by author, journal, year, or title",
    " help - Show available commands",
    " exit - Exit the application",
];

/// Line-based prompt/response channel
pub trait ConsoleIo {
    /// Show one line of text
    fn write(&mut self, text: &str);
    /// Read one line without its terminator; `None` once input is exhausted
    fn read(&mut self) -> Option<String>;
}

/// Console over the process's stdin and stdout
#[derive(Debug, Default)]
pub struct StdConsole;

impl ConsoleIo for StdConsole {
    fn write(&mut self, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write to stdout");
        }
    }

    fn read(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!(error = %e, "failed to read from stdin");
                None
            }
        }
    }
}

/// Console fed from a fixed script, recording everything written
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    outputs: Vec<String>,
}

impl ScriptedConsole {
    /// Create a console that answers with `inputs` in order
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: Vec::new(),
        }
    }

    /// Everything written so far, one entry per `write`
    #[must_use]
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }
}

impl ConsoleIo for ScriptedConsole {
    fn write(&mut self, text: &str) {
        self.outputs.push(text.to_string());
    }

    fn read(&mut self) -> Option<String> {
        self.inputs.pop_front()
    }
}

/// Prompt order for the interactive collector
const fn prompts(kind: ReferenceKind) -> &'static [(FieldName, &'static str)] {
    match kind {
        ReferenceKind::Article => &[
            (FieldName::Title, "Title"),
            (FieldName::Journal, "Journal"),
            (FieldName::Year, "Year"),
            (FieldName::Month, "Month"),
            (FieldName::Volume, "Volume"),
            (FieldName::Number, "Number"),
            (FieldName::Pages, "Pages"),
            (FieldName::Doi, "DOI"),
            (FieldName::Note, "Note"),
            (FieldName::Key, "Key"),
        ],
        ReferenceKind::InProceedings => &[
            (FieldName::Title, "Title"),
            (FieldName::BookTitle, "Book title"),
            (FieldName::Year, "Year"),
            (FieldName::Month, "Month"),
            (FieldName::Editor, "Editor"),
            (FieldName::Volume, "Volume"),
            (FieldName::Number, "Number"),
            (FieldName::Series, "Series"),
            (FieldName::Pages, "Pages"),
            (FieldName::Address, "Address"),
            (FieldName::Organization, "Organization"),
            (FieldName::Publisher, "Publisher"),
            (FieldName::Note, "Note"),
            (FieldName::Key, "Key"),
        ],
    }
}

/// Input ran out in the middle of a command
struct Closed;

/// The interactive command loop
#[derive(Debug)]
pub struct Session<C, S> {
    config: Config,
    console: C,
    store: S,
    references: Vec<Reference>,
}

impl<C, S> Session<C, S>
where
    C: ConsoleIo,
    S: ReferenceLoader + ReferenceSink,
{
    /// Create a session; references are loaded when [`Session::run`] starts
    pub fn new(config: Config, console: C, store: S) -> Self {
        Self {
            config,
            console,
            store,
            references: Vec::new(),
        }
    }

    /// References known to this session
    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// The console, e.g. to inspect a scripted transcript
    #[must_use]
    pub const fn console(&self) -> &C {
        &self.console
    }

    /// The backing store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run commands until `exit` or end of input
    pub fn run(&mut self) {
        self.console.write(&format!(
            "Using BibTeX file: {}",
            self.config.file_path().display()
        ));
        self.references = self.store.load_references();
        info!(count = self.references.len(), "loaded references");

        loop {
            self.console
                .write("\nChoose a command (type 'help' for available commands):");
            let Some(line) = self.console.read() else {
                debug!("input closed");
                return;
            };

            let command = line.trim().to_lowercase();
            let outcome = match command.as_str() {
                "add" => self.add(),
                "list" => {
                    self.list();
                    Ok(())
                }
                "filter" => self.filter(),
                "help" => {
                    self.help();
                    Ok(())
                }
                "exit" => {
                    self.console.write("Exiting the application. Goodbye!");
                    return;
                }
                _ => {
                    self.console
                        .write("Unknown command. Type 'help' to see available commands.");
                    Ok(())
                }
            };

            if outcome.is_err() {
                debug!(command = %command, "input closed mid-command");
                return;
            }
        }
    }

    fn help(&mut self) {
        for line in HELP {
            self.console.write(line);
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, Closed> {
        self.console.write(prompt);
        self.console
            .read()
            .map(|line| line.trim().to_string())
            .ok_or(Closed)
    }

    fn add(&mut self) -> Result<(), Closed> {
        let kind = loop {
            match self
                .ask("Reference type (1 = journal article, 2 = inproceedings):")?
                .as_str()
            {
                "1" => break ReferenceKind::Article,
                "2" => break ReferenceKind::InProceedings,
                _ => self.console.write("Please enter 1 or 2."),
            }
        };

        let mut reference = Reference::new(kind);
        let author = self.collect_authors()?;
        reference.common_mut().set_author(author);

        for &(field, label) in prompts(kind) {
            self.collect_field(&mut reference, field, label)?;
        }

        if let Ok(block) = reference.try_to_bibtex() {
            self.console.write(&block);
        }
        let answer = self.ask("Do you want to add this reference? (y/n)")?;
        if answer.to_lowercase() != "y" {
            self.console.write("Operation cancelled by the user.");
            return Ok(());
        }

        // only a persisted record joins the in-memory list
        match self.store.append(&reference) {
            Ok(()) => {
                info!(key = %reference.key(), "reference added");
                self.console.write("Reference added.");
                self.references.push(reference);
            }
            Err(e) => {
                warn!(error = %e, "failed to save reference");
                self.console
                    .write(&format!("Failed to save the reference: {e}"));
            }
        }
        Ok(())
    }

    fn collect_authors(&mut self) -> Result<String, Closed> {
        let mut authors = loop {
            let first = self.ask("Authors:")?;
            if !first.is_empty() {
                break vec![first];
            }
            self.console.write("at least one author is required");
        };

        loop {
            let next = self.ask("Add another author (leave empty to finish):")?;
            if next.is_empty() {
                break;
            }
            authors.push(next);
        }

        Ok(authors.join(", "))
    }

    fn collect_field(
        &mut self,
        reference: &mut Reference,
        field: FieldName,
        label: &str,
    ) -> Result<(), Closed> {
        let required = reference.kind().required_fields().contains(&field);
        loop {
            let value = self.ask(&format!("{label}:"))?;

            // blank optional input means "not set"
            if value.is_empty() && !required {
                return Ok(());
            }

            match reference.assign(field, value.as_str()) {
                Ok(()) if reference.get(field).is_some_and(|v| !v.is_empty()) => return Ok(()),
                Ok(()) => self.console.write(&format!("{field} is required")),
                Err(e @ Error::InvalidField { .. }) => self.console.write(&e.to_string()),
                Err(e) => {
                    warn!(error = %e, %field, "unexpected field error");
                    return Ok(());
                }
            }
        }
    }

    fn write_reference(console: &mut C, reference: &Reference) {
        match reference.try_to_bibtex() {
            Ok(block) => console.write(&block),
            Err(_) => console.write(&format!(
                "@{}{{{}}} (incomplete: {})",
                reference.kind(),
                reference.key(),
                reference.title()
            )),
        }
    }

    fn list(&mut self) {
        if self.references.is_empty() {
            self.console.write("No references found.");
            return;
        }

        for reference in &self.references {
            Self::write_reference(&mut self.console, reference);
            self.console.write("");
        }
    }

    fn filter(&mut self) -> Result<(), Closed> {
        let criteria = loop {
            let selection = self.ask(
                "Filter by (comma-separated: author, journal, year, title; leave empty to show all):",
            )?;
            match Criterion::parse_list(&selection) {
                Ok(criteria) => break criteria,
                Err(e) => self.console.write(&e.to_string()),
            }
        };

        if criteria.is_empty() {
            self.list();
            return Ok(());
        }

        let mut query = Query::new();
        for criterion in criteria {
            let text = self.ask(&format!(
                "{criterion} filter (quote for exact match, leave empty to skip):"
            ))?;
            query.push(criterion, &text);
        }

        let matches = query.apply(&self.references);
        debug!(clauses = query.clauses().len(), hits = matches.len(), "filtered references");

        if matches.is_empty() {
            self.console.write("No references match the given filters.");
            return Ok(());
        }
        for reference in matches {
            Self::write_reference(&mut self.console, reference);
            self.console.write("");
        }
        Ok(())
    }
}
