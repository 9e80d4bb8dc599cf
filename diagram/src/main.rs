use anyhow::Result;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use diagram::{
    compiler::{self, Definitions},
    eval::{self, Outcome},
    prelude::*,
    render,
    term::Term,
};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use util::{repl, ResultExt as _};

fn build_report(e: &ParseError) -> Report {
    let report = Report::build(ReportKind::Error, (), e.position());
    match e {
        ParseError::Syntax { span, message } => report.with_message(message).with_label(
            Label::new(span.clone())
                .with_message(format!("{}", message.fg(Color::Red)))
                .with_color(Color::Red),
        ),
        ParseError::UnknownVariable { name, span } => report
            .with_message(format!("Unknown variable {}", name.fg(Color::Red)))
            .with_label(
                Label::new(span.clone())
                    .with_message("Not bound by any enclosing abstraction")
                    .with_color(Color::Red),
            ),
        ParseError::UnknownName { name, span } => report
            .with_message(format!("Unknown name {}", name.fg(Color::Red)))
            .with_label(
                Label::new(span.clone())
                    .with_message("Not defined yet")
                    .with_color(Color::Red),
            ),
    }
    .finish()
}

#[derive(Debug, Error)]
enum Failure {
    #[error("{1}")]
    Parse(String, ParseError),
    #[error(transparent)]
    Invalid(#[from] InvalidTermError),
    #[error("{0}")]
    Usage(String),
}

#[derive(Clone, Copy, Debug, Default)]
struct Settings {
    /// Step bound for `eval` and `trace`; unbounded by default.
    steps: Option<usize>,
    diagram: render::Options,
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn limit(n: Option<usize>) -> String {
            n.map_or_else(|| "none".to_string(), |n| n.to_string())
        }
        writeln!(f, "steps  {}", limit(self.steps))?;
        writeln!(f, "style  {}", self.diagram.style)?;
        writeln!(f, "width  {}", limit(self.diagram.viewport.max_columns))?;
        write!(f, "height {}", limit(self.diagram.viewport.max_lines))
    }
}

fn parse_limit(value: &str) -> Result<Option<usize>, Failure> {
    match value {
        "none" => Ok(None),
        _ => value
            .parse()
            .map(Some)
            .map_err(|_| Failure::Usage(format!("Expected a number or `none`, found `{value}`"))),
    }
}

fn parse_term(input: &str, definitions: &Definitions) -> Result<Term, Failure> {
    compiler::parse_term(input, definitions).map_err(|e| Failure::Parse(input.to_string(), e))
}

fn report_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Normal { steps } => println!("Normal form after {steps} steps"),
        Outcome::Exhausted { steps } => println!("Stopped after {steps} steps"),
    }
}

/// Name under which the most recent term is kept.
const PREVIOUS: &str = "_";

#[derive(Default)]
struct Session {
    settings: Settings,
    definitions: Definitions,
}

impl Session {
    fn parse(&self, input: &str) -> Result<Term, Failure> {
        parse_term(input, &self.definitions)
    }

    fn remember(&mut self, term: &Term) {
        self.definitions.insert(PREVIOUS.to_string(), term.copy());
    }

    /// `NAME := term`. The definition also becomes the previous result.
    fn define(&mut self, name: &str, input: &str) -> Result<(), Failure> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Failure::Usage(format!(
                "Definition names are uppercase letters, got `{name}`"
            )));
        }
        let term = self.parse(input)?;
        println!("{name} := {term}");
        self.remember(&term);
        self.definitions.insert(name.to_string(), term);
        Ok(())
    }

    fn list_definitions(&self) {
        let mut names = self.definitions.keys().collect::<Vec<_>>();
        names.sort();
        for name in names {
            println!("{name} := {}", self.definitions[name]);
        }
    }

    fn set(&mut self, args: &str) -> Result<(), Failure> {
        let mut args = args.split_whitespace();
        match (args.next(), args.next()) {
            (None, _) => println!("{}", self.settings),
            (Some("steps"), Some(value)) => self.settings.steps = parse_limit(value)?,
            (Some("style"), Some(value)) => {
                self.settings.diagram.style = value.parse().map_err(Failure::Usage)?
            }
            (Some("width"), Some(value)) => {
                self.settings.diagram.viewport.max_columns = parse_limit(value)?
            }
            (Some("height"), Some(value)) => {
                self.settings.diagram.viewport.max_lines = parse_limit(value)?
            }
            (Some(key), _) => {
                return Err(Failure::Usage(format!(
                    "Usage: set [steps|style|width|height] <value>, got `{key}`"
                )))
            }
        }
        Ok(())
    }

    fn exec(&mut self, input: &str) -> Result<(), Failure> {
        let input = input.trim_start();
        if let Some((name, rest)) = input.split_once(":=") {
            return self.define(name.trim(), rest);
        }
        let (command, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        debug!(command, "evaluating");
        match command {
            "parse" => {
                let term = self.parse(rest)?;
                println!("{term:?}");
                self.remember(&term);
            }
            "print" => {
                let term = self.parse(rest)?;
                println!("{term}");
                self.remember(&term);
            }
            "reduce" => {
                let mut term = self.parse(rest)?;
                if eval::reduce(&mut term) {
                    println!("{term}");
                } else {
                    println!("{term} is in normal form");
                }
                self.remember(&term);
            }
            "eval" => {
                let mut term = self.parse(rest)?;
                let outcome = eval::normalize(&mut term, self.settings.steps);
                println!("{term}");
                report_outcome(outcome);
                self.remember(&term);
            }
            "diagram" => {
                let term = self.parse(rest)?;
                print!("{}", render::render(&term, &self.settings.diagram)?);
                self.remember(&term);
            }
            "trace" => {
                let mut term = self.parse(rest)?;
                term.check_closed()?;
                println!("{term}");
                let options = self.settings.diagram;
                let outcome = eval::trace(&mut term, self.settings.steps, |_, term| {
                    println!("{}", render::render(term, &options)?);
                    Ok::<_, Failure>(())
                })?;
                report_outcome(outcome);
                self.remember(&term);
            }
            "defs" => self.list_definitions(),
            "set" => self.set(rest)?,
            "" => {}
            _ => {
                return Err(Failure::Usage(format!(
                    "Unknown command `{command}`, expected one of parse, print, reduce, eval, diagram, trace, defs, set, or `NAME := term`"
                )))
            }
        }
        Ok(())
    }
}

impl repl::Repl for Session {
    type Error = anyhow::Error;
    const HISTORY: Option<&'static str> = Some("history.txt");

    fn evaluate(&mut self, input: String) -> Result<()> {
        match self.exec(&input) {
            Ok(()) => {}
            Err(Failure::Parse(source, e)) => build_report(&e).eprint(Source::from(&source))?,
            Err(e) => eprintln!("Error: {e}"),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init()
        .staticalize()?;

    let mut session = Session::default();
    let scripts = std::env::args().skip(1).collect::<Vec<_>>();
    if scripts.is_empty() {
        repl::start_repl(session)?;
    } else {
        for path in scripts {
            let source = std::fs::read_to_string(&path)?;
            repl::run_script(&mut session, &source)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set() {
        let mut session = Session::default();
        session.set("steps 50").unwrap();
        session.set("style classic").unwrap();
        session.set("width none").unwrap();
        session.set("height 3").unwrap();
        assert_eq!(session.settings.steps, Some(50));
        assert_eq!(session.settings.diagram.style, render::Style::Classic);
        assert_eq!(session.settings.diagram.viewport.max_columns, None);
        assert_eq!(session.settings.diagram.viewport.max_lines, Some(3));
        assert!(session.set("steps many").is_err());
        assert!(session.set("style round").is_err());
        assert!(session.set("colour red").is_err());
    }

    #[test]
    fn test_exec() {
        let mut session = Session::default();
        session.set("steps 5").unwrap();
        assert!(session.exec("eval (λx.x x)(λx.x x)").is_ok());
        assert!(session.exec("trace (λx.λy.x)(λx.x)(λx.x)").is_ok());
        assert!(matches!(
            session.exec("print λx.y"),
            Err(Failure::Parse(_, ParseError::UnknownVariable { name: 'y', .. }))
        ));
        assert!(matches!(session.exec("frobnicate x"), Err(Failure::Usage(_))));
        assert!(session.exec("").is_ok());
    }

    fn term(s: &str) -> Term {
        s.parse().unwrap()
    }

    #[test]
    fn test_definitions() {
        let mut session = Session::default();
        session.exec("ID := λx.x").unwrap();
        session.exec("K:=λxy.x").unwrap();
        assert_eq!(session.definitions["ID"], term("λx.x"));
        assert_eq!(session.definitions["K"], term("λx.λy.x"));
        assert_eq!(session.definitions["_"], term("λx.λy.x"));

        session.exec("eval K ID (λx.x x)").unwrap();
        assert_eq!(session.definitions["_"], term("λx.x"));
        session.exec("print λa.a _").unwrap();
        assert_eq!(session.definitions["_"], term("λa.a (λx.x)"));
        assert!(session.exec("defs").is_ok());

        assert!(matches!(
            session.exec("eval K NOPE"),
            Err(Failure::Parse(_, ParseError::UnknownName { .. }))
        ));
        assert!(matches!(session.exec("id := λx.x"), Err(Failure::Usage(_))));
        assert!(matches!(session.exec(" := λx.x"), Err(Failure::Usage(_))));
        assert!(!session.definitions.contains_key("id"));
    }

    #[test]
    fn test_previous_result() {
        let mut session = Session::default();
        assert!(matches!(
            session.exec("print _"),
            Err(Failure::Parse(_, ParseError::UnknownName { .. }))
        ));
        session.exec("reduce (λfx.f x)(λx.x)").unwrap();
        assert_eq!(session.definitions["_"], term("λx.(λx.x) x"));
        session.exec("reduce _").unwrap();
        assert_eq!(session.definitions["_"], term("λx.x"));
        session.set("steps 3").unwrap();
        session.exec("trace _ _").unwrap();
        assert_eq!(session.definitions["_"], term("λx.x"));
    }
}
