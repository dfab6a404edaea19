use crate::config::RecoveryConfig;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

const MASK: &str = "****";

/// The single value that varies between two runs of the same template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// File the dump is written to.
    Target,
    /// File the dump is read from.
    Source,
}

impl Placeholder {
    pub fn key(&self) -> &'static str {
        match self {
            Placeholder::Target => "target",
            Placeholder::Source => "source",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}}}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    /// Flag and value glued into one argument, hidden when the command is displayed.
    Secret { flag: &'static str, value: String },
    /// The placeholder, rendered as `prefix` followed by the substituted path.
    Slot { prefix: &'static str },
}

/// A fixed argument list for an external program with exactly one path hole.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTemplate {
    program: String,
    placeholder: Placeholder,
    tokens: Vec<Token>,
}

impl CommandTemplate {
    fn new(program: &str, placeholder: Placeholder, tokens: Vec<Token>) -> Self {
        let slots = tokens
            .iter()
            .filter(|t| matches!(t, Token::Slot { .. }))
            .count();
        assert_eq!(slots, 1, "command template needs exactly one placeholder");

        Self {
            program: program.to_string(),
            placeholder,
            tokens,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    /// Fills the placeholder with `path` and returns the command ready to run.
    ///
    /// The path is passed through as raw OS bytes; only the display form is lossy.
    pub fn substitute(&self, path: &Path) -> Invocation {
        let mut args = Vec::with_capacity(self.tokens.len());
        let mut shown = Vec::with_capacity(self.tokens.len());

        for token in &self.tokens {
            match token {
                Token::Literal(arg) => {
                    args.push(OsString::from(arg));
                    shown.push(arg.clone());
                }
                Token::Secret { flag, value } => {
                    args.push(OsString::from(format!("{}{}", flag, value)));
                    shown.push(format!("{}{}", flag, MASK));
                }
                Token::Slot { prefix } => {
                    let mut arg = OsString::from(prefix);
                    arg.push(path.as_os_str());
                    args.push(arg);
                    shown.push(format!("{}{}", prefix, path.to_string_lossy()));
                }
            }
        }

        Invocation {
            program: self.program.clone(),
            args,
            shown,
        }
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for token in &self.tokens {
            match token {
                Token::Literal(arg) => write!(f, " {}", quote(arg))?,
                Token::Secret { flag, .. } => write!(f, " {}{}", flag, MASK)?,
                Token::Slot { prefix } => {
                    write!(f, " {}", quote(&format!("{}{}", prefix, self.placeholder)))?
                }
            }
        }
        Ok(())
    }
}

/// Backup and restore templates derived once from a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTemplates {
    pub backup: CommandTemplate,
    pub restore: CommandTemplate,
}

impl CommandTemplates {
    pub fn build(config: &RecoveryConfig) -> Self {
        Self {
            backup: backup_template(config),
            restore: restore_template(config),
        }
    }
}

fn credentials(config: &RecoveryConfig) -> Vec<Token> {
    vec![
        Token::Literal(format!("-u{}", config.username)),
        Token::Secret {
            flag: "-p",
            value: config.password.clone(),
        },
        Token::Literal(format!("-h{}", config.hostname)),
    ]
}

fn backup_template(config: &RecoveryConfig) -> CommandTemplate {
    let mut tokens = credentials(config);
    tokens.push(Token::Literal("--add-drop-table".to_string()));
    tokens.push(Token::Literal("-r".to_string()));
    tokens.push(Token::Slot { prefix: "" });
    tokens.push(Token::Literal(config.schema.clone()));
    CommandTemplate::new(config.backup_command(), Placeholder::Target, tokens)
}

fn restore_template(config: &RecoveryConfig) -> CommandTemplate {
    let mut tokens = credentials(config);
    tokens.push(Token::Literal(config.schema.clone()));
    tokens.push(Token::Literal("-e".to_string()));
    tokens.push(Token::Slot { prefix: "source " });
    CommandTemplate::new(config.restore_command(), Placeholder::Source, tokens)
}

/// A fully substituted command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    shown: Vec<String>,
}

impl Invocation {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

/// Renders the command with secrets masked.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.shown {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> String {
    if arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}
