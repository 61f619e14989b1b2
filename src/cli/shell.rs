//! Interactive menu loop over a dictionary service
//!
//! Generic over input and output so sessions can be scripted in tests.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::services::{DictionaryService, LoadOutcome, Persistence};
use crate::application::ApplicationError;
use crate::cli::menu::MenuItem;
use crate::cli::output;
use crate::domain::parse_translations;

/// Result of one menu action: keep looping or end the session (stdin closed).
type Step = io::Result<ControlFlow<()>>;

pub struct Shell<'a, R, W> {
    service: &'a mut DictionaryService,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(service: &'a mut DictionaryService, input: R, out: W) -> Self {
        Self {
            service,
            input,
            out,
        }
    }

    /// Give back the output writer (used by tests to inspect a session).
    pub fn into_output(self) -> W {
        self.out
    }

    /// Report how the snapshot load at startup went.
    pub fn report_load(&mut self, outcome: &LoadOutcome) -> io::Result<()> {
        match outcome {
            LoadOutcome::Loaded { path, dictionaries } => output::success(
                &mut self.out,
                &format!(
                    "Loaded {} {} from {}",
                    dictionaries,
                    if *dictionaries == 1 { "dictionary" } else { "dictionaries" },
                    path.display()
                ),
            ),
            LoadOutcome::FirstRun { path } => output::info(
                &mut self.out,
                &format!(
                    "No dictionary file at {} yet; it is created on the first save.",
                    path.display()
                ),
            ),
            LoadOutcome::Failed { error, backup } => {
                output::error(
                    &mut self.out,
                    &format!("cannot load dictionaries: {}", output::error_chain(error)),
                )?;
                match backup {
                    Some(Ok(path)) => output::warning(
                        &mut self.out,
                        &format!("unreadable file moved to {}", path.display()),
                    )?,
                    Some(Err(e)) => output::error(&mut self.out, &output::error_chain(e))?,
                    None => {}
                }
                output::info(&mut self.out, "Starting with no dictionaries.")
            }
        }
    }

    /// Run the menu loop until Exit is chosen or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.ask("Choose an action (1-9):")? else {
                debug!("Input closed at menu");
                return Ok(());
            };
            let step = match MenuItem::parse(&choice) {
                Some(MenuItem::Exit) => return Ok(()),
                Some(item) => self.dispatch(item)?,
                None => {
                    output::error(&mut self.out, "invalid choice, try again")?;
                    ControlFlow::Continue(())
                }
            };
            if step.is_break() {
                debug!("Input closed inside action");
                return Ok(());
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        output::header(&mut self.out, "Menu:")?;
        for item in MenuItem::ALL {
            output::info(&mut self.out, &format!("{}. {}", item.number(), item.label()))?;
        }
        Ok(())
    }

    /// Prompt and read one line without its terminator. `None` on EOF.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        output::prompt(&mut self.out, prompt)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    #[instrument(skip(self))]
    fn dispatch(&mut self, item: MenuItem) -> Step {
        match item {
            MenuItem::CreateDictionary => self.create_dictionary(),
            MenuItem::AddWord => self.add_word(),
            MenuItem::ReplaceWord => self.replace_word(),
            MenuItem::DeleteWord => self.delete_word(),
            MenuItem::SearchTranslation => self.search_translation(),
            MenuItem::ExportToFile => self.export_to_file(),
            MenuItem::ListDictionaries => self.list_dictionaries(),
            MenuItem::ListWords => self.list_words(),
            MenuItem::Exit => Ok(ControlFlow::Break(())),
        }
    }

    fn create_dictionary(&mut self) -> Step {
        let Some(name) = self.ask("Dictionary name:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let persistence = self.service.create_dictionary(&name);
        output::success(&mut self.out, &format!("Dictionary '{name}' created."))?;
        self.report_persistence(&persistence)?;
        Ok(ControlFlow::Continue(()))
    }

    fn add_word(&mut self) -> Step {
        let Some(dictionary) = self.ask("Dictionary name:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(word) = self.ask("Word:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(input) = self.ask("Translations (comma-separated):")? else {
            return Ok(ControlFlow::Break(()));
        };
        match self
            .service
            .add_word(&dictionary, &word, parse_translations(&input))
        {
            Ok(persistence) => {
                output::success(
                    &mut self.out,
                    &format!("Word '{word}' and its translations added to dictionary '{dictionary}'."),
                )?;
                self.report_persistence(&persistence)?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn replace_word(&mut self) -> Step {
        let Some(dictionary) = self.ask("Dictionary name:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(word) = self.ask("Word:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(input) = self.ask("New translations (comma-separated):")? else {
            return Ok(ControlFlow::Break(()));
        };
        match self
            .service
            .replace_word(&dictionary, &word, parse_translations(&input))
        {
            Ok(persistence) => {
                output::success(
                    &mut self.out,
                    &format!("Translations of '{word}' in dictionary '{dictionary}' replaced."),
                )?;
                self.report_persistence(&persistence)?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn delete_word(&mut self) -> Step {
        let Some(dictionary) = self.ask("Dictionary name:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(word) = self.ask("Word:")? else {
            return Ok(ControlFlow::Break(()));
        };
        match self.service.delete_word(&dictionary, &word) {
            Ok(persistence) => {
                output::success(
                    &mut self.out,
                    &format!("Word '{word}' deleted from dictionary '{dictionary}'."),
                )?;
                self.report_persistence(&persistence)?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn search_translation(&mut self) -> Step {
        let Some(dictionary) = self.ask("Dictionary name:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(word) = self.ask("Word:")? else {
            return Ok(ControlFlow::Break(()));
        };
        match self.service.search_translation(&dictionary, &word) {
            Ok(translations) => {
                output::header(&mut self.out, &format!("Translations of '{word}':"))?;
                for translation in translations {
                    output::info(&mut self.out, translation)?;
                }
            }
            Err(e) => output::error(&mut self.out, &e)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn export_to_file(&mut self) -> Step {
        let Some(dictionary) = self.ask("Dictionary name:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(file_name) = self.ask("Export file name:")? else {
            return Ok(ControlFlow::Break(()));
        };
        match self
            .service
            .export_to_file(&dictionary, Path::new(&file_name))
        {
            Ok(()) => output::success(
                &mut self.out,
                &format!("Dictionary '{dictionary}' exported to '{file_name}'."),
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn list_dictionaries(&mut self) -> Step {
        output::header(&mut self.out, "Dictionaries:")?;
        let names = self.service.dictionary_names();
        if names.is_empty() {
            output::detail(&mut self.out, "(none)")?;
        }
        for name in names {
            output::info(&mut self.out, name)?;
        }
        Ok(ControlFlow::Continue(()))
    }

    fn list_words(&mut self) -> Step {
        let Some(name) = self.ask("Dictionary name:")? else {
            return Ok(ControlFlow::Break(()));
        };
        let dictionary = match self.service.dictionary(&name) {
            Ok(dictionary) => dictionary,
            Err(e) => {
                output::error(&mut self.out, &e)?;
                return Ok(ControlFlow::Continue(()));
            }
        };
        output::header(
            &mut self.out,
            &format!("Words and translations in dictionary '{name}':"),
        )?;
        for (word, translations) in dictionary.iter() {
            output::info(&mut self.out, &format!("Word: {word}"))?;
            output::info(&mut self.out, "Translations:")?;
            for translation in translations {
                output::bullet(&mut self.out, translation)?;
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn report_persistence(&mut self, persistence: &Persistence) -> io::Result<()> {
        match persistence {
            Persistence::Saved(path) => {
                output::detail(&mut self.out, &format!("Saved to {}", path.display()))
            }
            Persistence::Deferred => output::detail(
                &mut self.out,
                "Not saved yet; written with the next create or add.",
            ),
            Persistence::Failed(e) => output::error(
                &mut self.out,
                &format!("cannot save dictionaries: {}", output::error_chain(e)),
            ),
        }
    }

    fn report_error(&mut self, error: &ApplicationError) -> io::Result<()> {
        output::error(&mut self.out, &output::error_chain(error))
    }
}
