use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};

const KEEP_HINT: &str = "Press Enter to keep the current action, or type a new one.";

/// Asks the operator what to do about a bug.
pub trait Prompter {
    fn prompt_new_action(&mut self, old_action: Option<&str>) -> Result<String>;
}

/// Line-based prompter over any reader/writer pair.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        ConsolePrompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompter { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn prompt_new_action(&mut self, old_action: Option<&str>) -> Result<String> {
        match old_action {
            Some(old) => {
                writeln!(self.output, "    {}", KEEP_HINT)?;
                write!(self.output, "    Action [{}]: ", old)?;
            }
            None => write!(self.output, "    Action: ")?,
        }
        self.output.flush()?;

        let mut input = String::new();
        // Ctrl-C never gets here; the interrupt watcher ends the process.
        if self.input.read_line(&mut input)? == 0 {
            bail!("Input cancelled.");
        }

        let input = input.trim();
        match old_action {
            Some(old) if input.is_empty() => Ok(old.to_string()),
            _ => Ok(input.to_string()),
        }
    }
}
