use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Eval failed: {0:?}")]
    EvalError(E),
}

pub trait Repl {
    type Error: std::fmt::Debug;
    const HISTORY: Option<&'static str> = None;
    const PROMPT: &'static str = ">> ";
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error>;
}

/// Joins lines ending with a detached backslash into a single input.
///
/// Only a backslash that is the whole line or follows whitespace continues the
/// input, so `(\` at the end of a line stays a lambda sign.
#[derive(Default, Debug)]
struct Continuation(Option<String>);

fn continues(line: &str) -> bool {
    match line.strip_suffix('\\') {
        Some(rest) => rest.is_empty() || rest.ends_with(char::is_whitespace),
        None => false,
    }
}

impl Continuation {
    /// Returns the complete input once a line without a continuation marker arrives.
    fn feed(&mut self, mut line: String) -> Option<String> {
        if continues(&line) {
            line.pop();
            line.push('\n');
            match self.0.as_mut() {
                Some(input) => input.push_str(&line),
                None => self.0 = Some(line),
            }
            return None;
        }
        Some(match self.0.take() {
            Some(mut input) => {
                input.push_str(&line);
                input
            }
            None => line,
        })
    }

    fn finish(self) -> Option<String> {
        self.0
    }
}

pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    if let Some(history) = R::HISTORY {
        editor.load_history(history).ok();
    }
    let mut pending = Continuation::default();
    loop {
        match editor.readline(R::PROMPT) {
            Ok(line) => {
                let Some(input) = pending.feed(line) else {
                    continue;
                };
                editor.add_history_entry(input.as_str());
                repl.evaluate(input).map_err(Error::EvalError)?;
                if let Some(history) = R::HISTORY {
                    editor.save_history(history).map_err(Error::Readline)?;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Bye!");
                break Ok(());
            }
            Err(e) => break Err(Error::Readline(e)),
        }
    }
}

/// Evaluates `source` line by line with the same continuation rules as the
/// interactive loop. Blank lines are skipped.
pub fn run_script<R: Repl>(repl: &mut R, source: &str) -> Result<(), Error<R::Error>> {
    let mut pending = Continuation::default();
    for line in source.lines() {
        if let Some(input) = pending.feed(line.to_string()) {
            if !input.trim().is_empty() {
                repl.evaluate(input).map_err(Error::EvalError)?;
            }
        }
    }
    if let Some(input) = pending.finish() {
        repl.evaluate(input).map_err(Error::EvalError)?;
    }
    Ok(())
}
