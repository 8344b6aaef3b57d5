//! Interactive questions asked by commands

use std::io::{self, BufRead, Write};

/// Source of answers to interactive questions
///
/// Commands only talk to the user through this trait so they can be driven
/// by scripted answers in tests.
pub trait Prompt {
    /// Ask for a line of text
    fn text(&mut self, message: &str) -> io::Result<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool>;

    /// Ask until one of `choices` is given (case-insensitive)
    fn choice(&mut self, message: &str, choices: &[&str]) -> io::Result<String>;
}

/// Prompt reading answers from a terminal
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Ask on stderr, read from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}: ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no input available to answer the prompt",
            ));
        }

        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn text(&mut self, message: &str) -> io::Result<String> {
        loop {
            let answer = self.ask(message)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.ask(&format!("{} [{}]", message, hint))?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Error: invalid input")?,
            }
        }
    }

    fn choice(&mut self, message: &str, choices: &[&str]) -> io::Result<String> {
        loop {
            let answer = self.ask(&format!("{} ({})", message, choices.join(", ")))?;
            if let Some(choice) = choices.iter().find(|c| c.eq_ignore_ascii_case(&answer)) {
                return Ok(choice.to_string());
            }
            writeln!(
                self.output,
                "Error: '{}' is not one of {}.",
                answer,
                choices.join(", ")
            )?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(input: &str) -> TerminalPrompt<&[u8], Vec<u8>> {
        TerminalPrompt::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn text_skips_empty_answers() {
        let mut prompt = prompt("\n  \n123\n");
        assert_eq!(prompt.text("User id").unwrap(), "123");
        assert_eq!(String::from_utf8(prompt.output).unwrap(), "User id: User id: User id: ");
    }

    #[test]
    fn confirm_uses_default_on_empty_answer() {
        assert!(!prompt("\n").confirm("Continue?", false).unwrap());
        assert!(prompt("\n").confirm("Continue?", true).unwrap());
        assert!(prompt("maybe\nYES\n").confirm("Continue?", false).unwrap());
    }

    #[test]
    fn choice_retries_until_valid() {
        let mut prompt = prompt("java\nCSharp\n");
        assert_eq!(
            prompt.choice("Language", &["python", "csharp"]).unwrap(),
            "csharp"
        );
    }

    #[test]
    fn closed_input_is_an_error() {
        let err = prompt("").text("User id").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
