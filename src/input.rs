//! Line input for wizard answers
//!
//! Answers come from a [`LineSource`], so the wizard can be driven by the
//! terminal in production and by a scripted list of answers in tests. Every
//! answer is trimmed and has `$VAR` / `${VAR}` references expanded before it
//! reaches the wizard. `exit` and `quit` end the program at any prompt.
//!
//! On a terminal, answers are edited with `inquire`: Tab completes file and
//! directory names and earlier answers are offered as suggestions.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::{self, MAIN_SEPARATOR, Path};

use inquire::autocompletion::{Autocomplete, Replacement};
use inquire::ui::{RenderConfig, Styled};
use inquire::{CustomUserError, InquireError, Text};

use crate::error::{Result, WizardError};
use crate::process_guard::CancellationToken;

/// Keywords that leave the wizard from any prompt (compared case-insensitively).
pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit"];

/// Marker shown where the answer is typed.
pub const ANSWER_MARKER: &str = ">";

/// Source of raw answer lines.
pub trait LineSource {
    /// Read one line without its terminator. `Ok(None)` means end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// True when the source draws its own answer marker.
    fn draws_marker(&self) -> bool {
        false
    }
}

/// Read one plain line from stdin, without line editing.
pub fn read_plain_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Answers typed on the terminal.
///
/// Falls back to plain stdin reads when any standard stream is not a terminal.
#[derive(Debug, Clone)]
pub struct TerminalLines {
    interactive: bool,
    history: Vec<String>,
}

impl Default for TerminalLines {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalLines {
    pub fn new() -> Self {
        Self {
            // The editor draws on stderr
            interactive: io::stdin().is_terminal()
                && io::stdout().is_terminal()
                && io::stderr().is_terminal(),
            history: Vec::new(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn remember(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.history.last().is_some_and(|last| last == line) {
            return;
        }
        self.history.push(line.to_string());
    }

    fn prompt_terminal(&mut self) -> io::Result<Option<String>> {
        let render_config = RenderConfig::default()
            .with_prompt_prefix(Styled::new(""))
            .with_answered_prompt_prefix(Styled::new(""));

        let answer = Text::new(ANSWER_MARKER)
            .with_render_config(render_config)
            .with_autocomplete(PathCompleter::new(self.history.clone()))
            .prompt();

        match answer {
            Ok(line) => {
                self.remember(&line);
                Ok(Some(line))
            }
            // Ctrl+C and Esc arrive as key events in raw mode
            Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => Ok(None),
            Err(InquireError::NotTTY) => {
                tracing::debug!("Terminal unavailable, reading plain lines");
                self.interactive = false;
                read_plain_line()
            }
            Err(InquireError::IO(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }
}

impl LineSource for TerminalLines {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.interactive {
            self.prompt_terminal()
        } else {
            read_plain_line()
        }
    }

    fn draws_marker(&self) -> bool {
        self.interactive
    }
}

/// Tab completion over the filesystem plus earlier answers.
#[derive(Debug, Clone, Default)]
pub struct PathCompleter {
    history: Vec<String>,
}

impl PathCompleter {
    pub fn new(history: Vec<String>) -> Self {
        Self { history }
    }

    /// Earlier answers extending `input`, most recent first.
    fn history_matches(&self, input: &str) -> Vec<String> {
        let mut matches: Vec<String> = Vec::new();
        for entry in self.history.iter().rev() {
            if entry.starts_with(input) && entry != input && !matches.contains(entry) {
                matches.push(entry.clone());
            }
        }
        matches
    }
}

impl Autocomplete for PathCompleter {
    fn get_suggestions(&mut self, input: &str) -> std::result::Result<Vec<String>, CustomUserError> {
        let mut suggestions = self.history_matches(input);
        if !input.is_empty() {
            for file in list_files(input) {
                if !suggestions.contains(&file) {
                    suggestions.push(file);
                }
            }
        }
        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> std::result::Result<Replacement, CustomUserError> {
        if let Some(suggestion) = highlighted_suggestion {
            return Ok(Some(suggestion));
        }

        let files = list_files(input);
        let prefix = common_prefix(&files);
        Ok((prefix.len() > input.len()).then_some(prefix))
    }
}

/// Entries of the directory named by `line` whose names start with its last
/// component. Directories end with the path separator. Unreadable
/// directories give no entries.
pub fn list_files(line: &str) -> Vec<String> {
    let split = line
        .char_indices()
        .filter(|(_, c)| path::is_separator(*c))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    let (dir, file) = line.split_at(split);
    let read_from = if dir.is_empty() { Path::new(".") } else { Path::new(dir) };

    let Ok(entries) = fs::read_dir(read_from) else {
        return Vec::new();
    };

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let mut name = entry.file_name().to_str()?.to_string();
            if !name.starts_with(file) {
                return None;
            }
            if entry.file_type().ok()?.is_dir() {
                name.push(MAIN_SEPARATOR);
            }
            Some(format!("{}{}", dir, name))
        })
        .collect();
    files.sort();
    files
}

fn common_prefix(candidates: &[String]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };
    let mut len = first.len();
    for other in rest {
        len = first
            .char_indices()
            .zip(other.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(len);
    }
    first[..len].to_string()
}

/// Answers supplied up front, consumed in order.
#[derive(Debug, Default, Clone)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Read and normalise one answer.
///
/// End of input and a cancelled token both count as an interrupt.
pub fn read_answer(source: &mut dyn LineSource, cancel: &CancellationToken) -> Result<String> {
    if cancel.is_cancelled() {
        return Err(WizardError::Interrupted);
    }

    let line = source.read_line()?.ok_or(WizardError::Interrupted)?;

    if cancel.is_cancelled() {
        return Err(WizardError::Interrupted);
    }

    let answer = expand_env(line.trim());
    if is_exit_keyword(&answer) {
        return Err(WizardError::UserExit);
    }

    Ok(answer)
}

pub fn is_exit_keyword(answer: &str) -> bool {
    let lower = answer.trim().to_lowercase();
    EXIT_KEYWORDS.contains(&lower.as_str())
}

/// Expand environment references using the process environment.
pub fn expand_env(input: &str) -> String {
    expand_env_with(input, |name| std::env::var(name).ok())
}

/// Expand `$NAME` and `${NAME}` using `lookup`. Unknown names expand to
/// nothing; a `$` not followed by a name is kept as-is.
pub fn expand_env_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                rest = &braced[end + 1..];
                continue;
            }
            out.push('$');
            rest = after;
            continue;
        }

        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if name_len == 0 || after.starts_with(|c: char| c.is_ascii_digit()) {
            out.push('$');
            rest = after;
        } else {
            out.push_str(&lookup(&after[..name_len]).unwrap_or_default());
            rest = &after[name_len..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/ada".to_string()),
            "TMP" => Some("/var/tmp".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_plain_and_braced() {
        assert_eq!(expand_env_with("$HOME/mpm", lookup), "/home/ada/mpm");
        assert_eq!(expand_env_with("${TMP}dir", lookup), "/var/tmpdir");
        assert_eq!(expand_env_with("$HOME-$TMP", lookup), "/home/ada-/var/tmp");
    }

    #[test]
    fn test_expand_unknown_and_literal_dollar() {
        assert_eq!(expand_env_with("$NOPE/x", lookup), "/x");
        assert_eq!(expand_env_with("cost $ 5", lookup), "cost $ 5");
        assert_eq!(expand_env_with("${unclosed", lookup), "${unclosed");
        assert_eq!(expand_env_with("end$", lookup), "end$");
        assert_eq!(expand_env_with("no refs", lookup), "no refs");
    }

    #[test]
    fn test_exit_keywords() {
        assert!(is_exit_keyword("exit"));
        assert!(is_exit_keyword("QUIT"));
        assert!(!is_exit_keyword("exit now"));
        assert!(!is_exit_keyword("MATLAB"));
    }

    #[test]
    fn test_read_answer_trims_and_detects_exit() {
        let token = CancellationToken::new();
        let mut lines = ScriptedLines::new(["  R2024a  ", "Exit"]);

        assert_eq!(read_answer(&mut lines, &token).unwrap(), "R2024a");
        assert!(matches!(
            read_answer(&mut lines, &token),
            Err(WizardError::UserExit)
        ));
        assert!(matches!(
            read_answer(&mut lines, &token),
            Err(WizardError::Interrupted)
        ));
    }

    #[test]
    fn test_read_answer_after_cancel() {
        let token = CancellationToken::new();
        token.cancel();
        let mut lines = ScriptedLines::new(["R2024a"]);
        assert!(matches!(
            read_answer(&mut lines, &token),
            Err(WizardError::Interrupted)
        ));
        assert_eq!(lines.remaining(), 1);
    }

    #[test]
    fn test_list_files_matches_prefix_and_marks_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("licenses")).unwrap();
        std::fs::write(dir.path().join("license.lic"), "x").unwrap();
        std::fs::write(dir.path().join("mpm"), "x").unwrap();

        let base = format!("{}{}", dir.path().display(), MAIN_SEPARATOR);
        let files = list_files(&format!("{}lic", base));
        assert_eq!(
            files,
            vec![
                format!("{}license.lic", base),
                format!("{}licenses{}", base, MAIN_SEPARATOR),
            ]
        );

        assert_eq!(list_files(&base).len(), 3);
        assert!(list_files(&format!("{}zzz", base)).is_empty());
    }

    #[test]
    fn test_list_files_unreadable_dir_is_empty() {
        assert!(list_files("/definitely/not/a/real/dir/x").is_empty());
    }

    #[test]
    fn test_tab_completes_common_prefix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("network.lic"), "x").unwrap();
        std::fs::write(dir.path().join("network.dat"), "x").unwrap();
        let base = format!("{}{}", dir.path().display(), MAIN_SEPARATOR);

        let mut completer = PathCompleter::default();
        let completion = completer
            .get_completion(&format!("{}ne", base), None)
            .unwrap();
        assert_eq!(completion, Some(format!("{}network.", base)));

        let completion = completer
            .get_completion(&format!("{}network.", base), None)
            .unwrap();
        assert_eq!(completion, None);

        let completion = completer
            .get_completion("anything", Some("R2024a".to_string()))
            .unwrap();
        assert_eq!(completion, Some("R2024a".to_string()));
    }

    #[test]
    fn test_history_suggestions_most_recent_first() {
        let mut completer = PathCompleter::new(vec![
            "R2023b".to_string(),
            "MATLAB".to_string(),
            "R2024a".to_string(),
            "R2023b".to_string(),
        ]);

        assert_eq!(
            completer.get_suggestions("R20").unwrap(),
            vec!["R2023b".to_string(), "R2024a".to_string()]
        );
        assert_eq!(
            completer.get_suggestions("").unwrap(),
            vec!["R2023b".to_string(), "R2024a".to_string(), "MATLAB".to_string()]
        );
        assert!(completer.get_suggestions("R2024a").unwrap().is_empty());
    }

    #[test]
    fn test_terminal_history_skips_blank_and_repeats() {
        let mut lines = TerminalLines {
            interactive: false,
            history: Vec::new(),
        };
        lines.remember("  ");
        lines.remember("R2024a");
        lines.remember("R2024a ");
        lines.remember("MATLAB");
        assert_eq!(lines.history(), ["R2024a".to_string(), "MATLAB".to_string()]);
        assert!(!lines.draws_marker());
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix(&[]), "");
        assert_eq!(common_prefix(&["abc".to_string()]), "abc");
        assert_eq!(
            common_prefix(&["abcd".to_string(), "abxy".to_string(), "abc".to_string()]),
            "ab"
        );
        assert_eq!(common_prefix(&["x".to_string(), "y".to_string()]), "");
    }
}
