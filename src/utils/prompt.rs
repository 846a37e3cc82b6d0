use crate::domain::ports::Prompter;
use crate::utils::error::Result;
use std::io::{self, BufRead, Write};

/// Reads answers from stdin, one line per prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        match default {
            Some(d) => write!(stdout, "{} [{}] ", message, d)?,
            None => write!(stdout, "{} ", message)?,
        }
        stdout.flush()?;
        drop(stdout);

        read_answer(&mut io::stdin().lock(), default)
    }

    fn prompt_secret(&self, message: &str) -> Result<Option<String>> {
        tracing::debug!("Prompting for a secret value");
        self.prompt(message, None)
    }
}

/// `None` on EOF; an empty line falls back to `default`.
fn read_answer<R: BufRead>(reader: &mut R, default: Option<&str>) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim_end_matches(['\r', '\n']);
    if answer.is_empty() {
        Ok(Some(default.unwrap_or_default().to_string()))
    } else {
        Ok(Some(answer.to_string()))
    }
}
