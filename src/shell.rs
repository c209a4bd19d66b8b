//! Interactive terminal front end
//!
//! [`run`] walks the user through the merge with a sequence of prompts. The
//! prompts themselves go through the [`Prompter`] trait, so the flow can be
//! driven by a real terminal ([`TerminalPrompter`]) or by a script.

use std::path::PathBuf;

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::error::{Error, Result};
use crate::naming;
use crate::pdf::merge::compare_names;
use crate::pdf::{MergeOptions, MergeResult, OverwritePolicy};
use crate::report::{self, ReportLine, Tone};
use crate::scan::{self, InputFile};
use crate::select::Selection;

/// Choice offered by the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Merge,
    Exit,
}

/// Whether to merge everything or let the user pick files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    All,
    Selected,
}

/// How an interactive session ended
#[derive(Debug)]
pub enum Outcome {
    /// The user picked `Exit` from the menu
    Exited,
    /// A merged document was written
    Merged(MergeResult),
}

/// Source of answers for the interactive flow
pub trait Prompter {
    fn menu(&mut self) -> Result<MenuChoice>;

    /// Path to the folder holding the PDFs, as typed
    fn directory(&mut self) -> Result<String>;

    fn mode(&mut self) -> Result<MergeMode>;

    /// Pick any number of `names`; an empty answer is allowed
    fn choose(&mut self, names: &[String]) -> Result<Vec<String>>;

    /// Output base name, as typed (may be blank)
    fn output_name(&mut self) -> Result<String>;

    fn show(&mut self, line: &ReportLine);

    /// Progress bar for a merge of `len` files
    fn progress(&mut self, _len: u64) -> ProgressBar {
        ProgressBar::hidden()
    }
}

/// Run one interactive merge session
pub fn run(prompter: &mut impl Prompter, overwrite: OverwritePolicy) -> Result<Outcome> {
    if prompter.menu()? == MenuChoice::Exit {
        return Ok(Outcome::Exited);
    }

    let (directory, files) = ask_directory(prompter)?;
    if files.is_empty() {
        return Err(Error::EmptyInput(directory));
    }

    let selection = match prompter.mode()? {
        MergeMode::All => Selection::All,
        MergeMode::Selected => {
            let mut names: Vec<String> = files.iter().map(InputFile::name).collect();
            names.sort_by(|a, b| compare_names(a, b));
            Selection::Chosen(prompter.choose(&names)?)
        }
    };

    let output_name = ask_output_name(prompter)?;

    let options = MergeOptions {
        overwrite,
        progress: prompter.progress(files.len() as u64),
    };
    info!(dir = %directory.display(), output = %output_name, "starting merge");

    let result = crate::merge(&directory, &selection, &output_name, &options)?;
    for line in report::summarize(&result) {
        prompter.show(&line);
    }

    Ok(Outcome::Merged(result))
}

/// Ask for a directory until one can be scanned
fn ask_directory(prompter: &mut impl Prompter) -> Result<(PathBuf, Vec<InputFile>)> {
    loop {
        let answer = prompter.directory()?;
        let directory = PathBuf::from(answer.trim());

        match scan::scan_directory(&directory) {
            Ok(files) => return Ok((directory, files)),
            Err(Error::NotFound(_)) => prompter.show(&ReportLine::new(
                Tone::Error,
                "The folder path is invalid or does not exist.",
            )),
            Err(e) => return Err(e),
        }
    }
}

/// Ask for an output name until it resolves to a usable file name
fn ask_output_name(prompter: &mut impl Prompter) -> Result<String> {
    loop {
        let answer = prompter.output_name()?;
        match naming::output_file_name(&answer) {
            Ok(name) => return Ok(name),
            Err(e @ Error::InvalidOutputName(_)) => {
                prompter.show(&ReportLine::new(Tone::Error, e.to_string()))
            }
            Err(e) => return Err(e),
        }
    }
}

/// Prompter backed by the real terminal
pub struct TerminalPrompter {
    term: Term,
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }

    fn banner(&self) -> Result<()> {
        self.term.clear_screen()?;
        self.term.write_line(&format!(
            "{}\n",
            style("=== PDF Merger ===").cyan().bold()
        ))?;
        Ok(())
    }
}

impl Prompter for TerminalPrompter {
    fn menu(&mut self) -> Result<MenuChoice> {
        self.banner()?;
        let index = Select::with_theme(&self.theme)
            .with_prompt("Please select an option")
            .items(&["Merge PDF Files", "Exit"])
            .default(0)
            .interact_on(&self.term)?;
        Ok(if index == 0 { MenuChoice::Merge } else { MenuChoice::Exit })
    }

    fn directory(&mut self) -> Result<String> {
        let path = Input::<String>::with_theme(&self.theme)
            .with_prompt("Enter the path to the folder containing the PDFs to merge")
            .interact_text_on(&self.term)?;
        Ok(path)
    }

    fn mode(&mut self) -> Result<MergeMode> {
        let index = Select::with_theme(&self.theme)
            .with_prompt("Please select an option")
            .items(&["Merge all files in folder", "Merge only selected files"])
            .default(0)
            .interact_on(&self.term)?;
        Ok(if index == 0 { MergeMode::All } else { MergeMode::Selected })
    }

    fn choose(&mut self, names: &[String]) -> Result<Vec<String>> {
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt("Select the PDF files you want to merge (<space> toggles, <enter> confirms)")
            .items(names)
            .max_length(10)
            .interact_on(&self.term)?;
        Ok(picked.into_iter().map(|i| names[i].clone()).collect())
    }

    fn output_name(&mut self) -> Result<String> {
        let name = Input::<String>::with_theme(&self.theme)
            .with_prompt("Name the merged file (.pdf is added if missing, blank for a timestamp)")
            .allow_empty(true)
            .interact_text_on(&self.term)?;
        Ok(name)
    }

    fn show(&mut self, line: &ReportLine) {
        let styled = match line.tone {
            Tone::Success => style(&line.text).green(),
            Tone::Info => style(&line.text).cyan(),
            Tone::Warning => style(&line.text).yellow(),
            Tone::Error => style(&line.text).red(),
        };
        // A broken stdout leaves nothing useful to report to
        let _ = self.term.write_line(&styled.to_string());
    }

    fn progress(&mut self, len: u64) -> ProgressBar {
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} Merging PDFs... [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(len);
        bar.set_style(bar_style);
        bar
    }
}
