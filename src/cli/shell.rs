//! Line-driven front end: a rustyline editor for people, plain stdin for scripts.

use std::io::{self, BufRead, Lines, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io::print_info;
use crate::errors::CliError;

/// Environment variable that switches the shell to line-by-line stdin mode.
pub const SCRIPT_ENV: &str = "DAYBUDGET_CLI_SCRIPT";

const DISTRIBUTIONS: &[&str] = &["rest", "add-today", "add-savings"];
const METHODS: &[&str] = &["ask", "rest", "add-today", "add-savings"];
const CONFIG_ACTIONS: &[&str] = &["show", "set", "backup", "backups", "restore"];
const CONFIG_SWITCHES: &[&str] = &["color", "screen-reader", "currency-code", "parentheses"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut source = match mode {
        CliMode::Interactive => LineSource::editor(&context)?,
        CliMode::Script => LineSource::Stdin(io::stdin().lock().lines()),
    };
    if mode == CliMode::Interactive {
        context.greet();
    }

    while context.running {
        match source.next_line(&context.prompt())? {
            Input::Line(line) => match handle_line(&mut context, &line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err),
            },
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => {
                if mode == CliMode::Interactive {
                    print_info("Exiting shell.");
                }
                break;
            }
        }
    }
    Ok(())
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

enum LineSource {
    Editor(Box<Editor<ShellHelper, DefaultHistory>>),
    Stdin(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn editor(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<ShellHelper, DefaultHistory>::new()
            .map_err(|err| CliError::Command(err.to_string()))?;
        editor.set_helper(Some(ShellHelper::new(context.command_names())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self::Editor(Box::new(editor)))
    }

    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self {
            LineSource::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.trim()).ok();
                    }
                    Ok(Input::Line(line))
                }
                Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                Err(ReadlineError::Eof) => Ok(Input::Closed),
                Err(err) => Err(CliError::Command(err.to_string())),
            },
            LineSource::Stdin(lines) => match lines.next() {
                Some(line) => Ok(Input::Line(line?)),
                None => Ok(Input::Closed),
            },
        }
    }
}

/// Runs one shell line. Blank lines and `#` comments are skipped.
pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = parse_command_line(trimmed)?;
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(trimmed.to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(input)
        .map_err(|err| CommandError::InvalidArguments(format!("cannot read `{input}`: {err}")))
}

/// Completes command names and the fixed words their arguments accept.
struct ShellHelper {
    commands: Vec<String>,
}

impl ShellHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn words_after(&self, earlier: &[String]) -> Vec<&str> {
        let earlier: Vec<&str> = earlier.iter().map(String::as_str).collect();
        match earlier.as_slice() {
            [] | ["help"] => self.commands.iter().map(String::as_str).collect(),
            ["method"] => METHODS.to_vec(),
            ["distribute"] => DISTRIBUTIONS.to_vec(),
            ["day"] => vec!["now"],
            ["history"] => vec!["all"],
            ["config"] => CONFIG_ACTIONS.to_vec(),
            ["config", "set"] => {
                let mut keys = vec!["locale"];
                keys.extend_from_slice(CONFIG_SWITCHES);
                keys
            }
            ["config", "set", key] if CONFIG_SWITCHES.contains(key) => vec!["on", "off"],
            _ => Vec::new(),
        }
    }

    /// Start of the word under the cursor and the candidates for it.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let earlier: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let needle = prefix[start..].to_ascii_lowercase();
        let words = self
            .words_after(&earlier)
            .into_iter()
            .filter(|word| word.starts_with(&needle))
            .map(String::from)
            .collect();
        (start, words)
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(line, pos);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> ShellHelper {
        ShellHelper::new(vec!["spend", "status", "stats", "method", "Help"])
    }

    #[test]
    fn parse_line_handles_quotes() {
        let tokens = parse_command_line("spend 12.50 \"coffee and cake\"").unwrap();
        assert_eq!(tokens, vec!["spend", "12.50", "coffee and cake"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(matches!(
            parse_command_line("spend 3 \"oops"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn completes_command_names() {
        let (start, words) = helper().candidates("st", 2);
        assert_eq!(start, 0);
        assert_eq!(words, vec!["stats", "status"]);
        assert_eq!(helper().candidates("help sp", 7).1, vec!["spend"]);
    }

    #[test]
    fn completes_arguments_of_known_commands() {
        let (start, words) = helper().candidates("method add", 10);
        assert_eq!(start, 7);
        assert_eq!(words, vec!["add-today", "add-savings"]);
        assert_eq!(helper().candidates("config set color o", 18).1, vec!["on", "off"]);
        assert!(helper().candidates("spend 4", 7).1.is_empty());
    }
}
