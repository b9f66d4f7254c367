//! Closed-world command simulation.
//!
//! The interpreter maps free text to canned terminal output using an ordered
//! list of [`Recognizer`]s. The first recognizer whose predicate accepts the
//! command produces the response; when none does, the result is a
//! `command not found` message naming the command's first word. Nothing is
//! ever executed.
//!
//! ```rust
//! use labsim_core::interpreter::{CommandInterpreter, Interpretation};
//!
//! let interpreter = CommandInterpreter::builtin();
//! assert_eq!(
//!     interpreter.interpret("pwd"),
//!     Interpretation::Text("/home/student".to_string())
//! );
//! assert_eq!(interpreter.interpret("clear"), Interpretation::Clear);
//! assert_eq!(
//!     interpreter.interpret("rustc --version"),
//!     Interpretation::Text("bash: rustc: command not found".to_string())
//! );
//! ```

mod builtin;


/// Result of interpreting one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Text to show in the transcript (may be empty, as for `cd`)
    Text(String),
    /// The caller should wipe the visible transcript
    Clear,
}

impl Interpretation {
    /// Output text as recorded in the transcript. `Clear` records as empty.
    pub fn output(&self) -> &str {
        match self {
            Interpretation::Text(text) => text,
            Interpretation::Clear => "",
        }
    }
}

/// Decides whether a recognizer handles a (trimmed) command.
pub type Predicate = fn(&str) -> bool;

/// Produces the simulated output for a (trimmed) command.
pub type Responder = fn(&str) -> Interpretation;

/// One entry in the dispatch table.
#[derive(Clone, Copy)]
pub struct Recognizer {
    pub name: &'static str,
    pub matches: Predicate,
    pub respond: Responder,
}

impl Recognizer {
    pub const fn new(name: &'static str, matches: Predicate, respond: Responder) -> Self {
        Self {
            name,
            matches,
            respond,
        }
    }
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer").field("name", &self.name).finish()
    }
}

/// Ordered dispatch table of recognizers.
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    recognizers: Vec<Recognizer>,
}

impl CommandInterpreter {
    /// Interpreter with the given recognizers and nothing else.
    pub fn new(recognizers: Vec<Recognizer>) -> Self {
        Self { recognizers }
    }

    /// Interpreter with the built-in Linux, container and networking table.
    pub fn builtin() -> Self {
        Self::new(builtin::recognizers())
    }

    /// Registers a recognizer ahead of all existing ones.
    pub fn with_recognizer(mut self, recognizer: Recognizer) -> Self {
        self.recognizers.insert(0, recognizer);
        self
    }

    /// Names of the recognizers in dispatch order.
    pub fn recognizer_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.recognizers.iter().map(|r| r.name)
    }

    /// Maps a command to its simulated output.
    pub fn interpret(&self, command: &str) -> Interpretation {
        let command = command.trim();
        self.recognizers
            .iter()
            .find(|r| (r.matches)(command))
            .map(|r| (r.respond)(command))
            .unwrap_or_else(|| Interpretation::Text(not_found(command)))
    }
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::builtin()
    }
}

/// True if `command` is exactly `name` or starts with `name` followed by
/// whitespace. `name` may itself contain a space (`ip addr`).
pub fn is_command(command: &str, name: &str) -> bool {
    command
        .strip_prefix(name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// Argument `n` (0 = the first word after the command name).
pub fn argument(command: &str, n: usize) -> Option<&str> {
    command.split_whitespace().nth(n + 1)
}

fn not_found(command: &str) -> String {
    let first = command.split_whitespace().next().unwrap_or(command);
    format!("bash: {first}: command not found")
}
