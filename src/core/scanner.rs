use std::collections::VecDeque;

use super::error::CompileError;
use super::registry::{FlagKind, FlagRegistry};

/// Outcome of one tokenizer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// A resolved (flag name, value) pair. Boolean flags always carry a
    /// normalized `"true"` or `"false"` value.
    Flag { name: String, value: String },
    /// No more flags; the remaining tokens are image and command.
    Done,
    /// The token was a line-continuation marker; call again.
    Skip,
}

/// The unconsumed tokens of one invocation. Shrinks monotonically as flags,
/// the image, and trailing command arguments are pulled off the front.
#[derive(Debug)]
pub struct TokenStream {
    tokens: VecDeque<String>,
}

impl TokenStream {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Consume and return the next raw token.
    pub fn pop(&mut self) -> Option<String> {
        self.tokens.pop_front()
    }

    /// Consume everything that remains, in order.
    pub fn drain(&mut self) -> Vec<String> {
        self.tokens.drain(..).collect()
    }

    /// Scan one flag off the front of the stream.
    ///
    /// Looks ahead at most one token. The registry is consulted only to
    /// learn whether the flag is boolean; unknown flags are scanned like
    /// any other value-taking flag and left for the compiler to judge.
    pub fn next_flag(&mut self, registry: &FlagRegistry) -> Result<Scan, CompileError> {
        let Some(first) = self.tokens.front() else {
            return Ok(Scan::Done);
        };

        if !first.starts_with('-') {
            if first.starts_with('\\') {
                // Line-continuation marker from a copy-pasted multi-line
                // command; drop it rather than mistaking it for the image.
                self.tokens.pop_front();
                return Ok(Scan::Skip);
            }
            // Likely the image name; leave it in place.
            return Ok(Scan::Done);
        }

        let raw = self
            .tokens
            .pop_front()
            .unwrap_or_default();
        if raw.len() < 2 {
            return Err(CompileError::InvalidFlag(raw));
        }

        let dashes = if raw.as_bytes()[1] == b'-' { 2 } else { 1 };
        if raw == "--" {
            // Explicit flag terminator.
            return Ok(Scan::Done);
        }

        let stripped = &raw[dashes..];
        if stripped.is_empty() || stripped == "-" || stripped == "=" {
            return Ok(Scan::Done);
        }

        let (name, inline) = match stripped.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (stripped.to_string(), None),
        };

        if registry.kind_of(&name) == Some(FlagKind::Bool) {
            let value = self.scan_bool_value(&name, inline)?;
            return Ok(Scan::Flag { name, value });
        }

        let value = match inline {
            Some(value) => value,
            None => match self.tokens.front() {
                Some(next) if !next.starts_with('-') => {
                    self.tokens.pop_front().unwrap_or_default()
                }
                _ => return Err(CompileError::MissingFlagArgument(name)),
            },
        };

        Ok(Scan::Flag { name, value })
    }

    /// Resolve the value of a boolean flag.
    ///
    /// With an inline `=value` the literal must parse. Without one, a
    /// dash-leading next token means the flag is implicitly true; a next
    /// token that parses as a boolean literal sets the flag false and is
    /// consumed as its value (`-t false` reads as an explicit disable); an
    /// unparseable next token is left alone for image/command parsing and
    /// the flag defaults to true.
    fn scan_bool_value(
        &mut self,
        name: &str,
        inline: Option<String>,
    ) -> Result<String, CompileError> {
        if let Some(value) = inline {
            return match parse_bool_literal(&value) {
                Some(parsed) => Ok(parsed.to_string()),
                None => Err(CompileError::InvalidFlagValue {
                    flag: name.to_string(),
                    value,
                }),
            };
        }

        match self.tokens.front() {
            Some(next) if next.starts_with('-') => Ok("true".to_string()),
            Some(next) => {
                if parse_bool_literal(next).is_some() {
                    self.tokens.pop_front();
                    Ok("false".to_string())
                } else {
                    Ok("true".to_string())
                }
            }
            None => Ok("true".to_string()),
        }
    }
}

/// Boolean literals accepted for flag values, matching the usual
/// command-line convention (`1/t/true` and `0/f/false`, case-insensitive
/// on the word forms).
fn parse_bool_literal(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Some(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(tokens: &[&str]) -> TokenStream {
        TokenStream::new(tokens.iter().map(|t| t.to_string()).collect())
    }

    fn flag(scan: Scan) -> (String, String) {
        match scan {
            Scan::Flag { name, value } => (name, value),
            other => panic!("expected a flag, got {other:?}"),
        }
    }

    #[test]
    fn empty_stream_is_done() {
        let reg = FlagRegistry::new();
        assert_eq!(stream(&[]).next_flag(&reg).unwrap(), Scan::Done);
    }

    #[test]
    fn image_token_is_done_and_not_consumed() {
        let reg = FlagRegistry::new();
        let mut s = stream(&["nginx"]);
        assert_eq!(s.next_flag(&reg).unwrap(), Scan::Done);
        assert_eq!(s.pop().as_deref(), Some("nginx"));
    }

    #[test]
    fn backslash_is_skipped() {
        let reg = FlagRegistry::new();
        let mut s = stream(&["\\", "nginx"]);
        assert_eq!(s.next_flag(&reg).unwrap(), Scan::Skip);
        assert_eq!(s.next_flag(&reg).unwrap(), Scan::Done);
    }

    #[test]
    fn bare_dash_is_invalid() {
        let reg = FlagRegistry::new();
        let err = stream(&["-"]).next_flag(&reg).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFlag(_)));
    }

    #[test]
    fn double_dash_terminates() {
        let reg = FlagRegistry::new();
        let mut s = stream(&["--", "-not-a-flag"]);
        assert_eq!(s.next_flag(&reg).unwrap(), Scan::Done);
        assert_eq!(s.pop().as_deref(), Some("-not-a-flag"));
    }

    #[test]
    fn inline_value_wins() {
        let reg = FlagRegistry::new();
        let (name, value) = flag(stream(&["--name=web"]).next_flag(&reg).unwrap());
        assert_eq!(name, "name");
        assert_eq!(value, "web");
    }

    #[test]
    fn inline_value_splits_on_first_equals() {
        let reg = FlagRegistry::new();
        let (name, value) = flag(stream(&["-e=FOO=bar"]).next_flag(&reg).unwrap());
        assert_eq!(name, "e");
        assert_eq!(value, "FOO=bar");
    }

    #[test]
    fn following_token_is_the_value() {
        let reg = FlagRegistry::new();
        let mut s = stream(&["-p", "80:80", "nginx"]);
        let (name, value) = flag(s.next_flag(&reg).unwrap());
        assert_eq!(name, "p");
        assert_eq!(value, "80:80");
        assert_eq!(s.next_flag(&reg).unwrap(), Scan::Done);
    }

    #[test]
    fn missing_argument_is_an_error() {
        let reg = FlagRegistry::new();
        let err = stream(&["--name"]).next_flag(&reg).unwrap_err();
        assert!(matches!(err, CompileError::MissingFlagArgument(ref f) if f == "name"));
    }

    #[test]
    fn dash_leading_value_is_not_consumed() {
        let reg = FlagRegistry::new();
        let err = stream(&["--name", "-d"]).next_flag(&reg).unwrap_err();
        assert!(matches!(err, CompileError::MissingFlagArgument(_)));
    }

    #[test]
    fn bool_alone_defaults_true() {
        let reg = FlagRegistry::new();
        let (name, value) = flag(stream(&["-d"]).next_flag(&reg).unwrap());
        assert_eq!(name, "d");
        assert_eq!(value, "true");
    }

    #[test]
    fn bool_before_another_flag_is_true() {
        let reg = FlagRegistry::new();
        let mut s = stream(&["-d", "-p", "80:80"]);
        let (_, value) = flag(s.next_flag(&reg).unwrap());
        assert_eq!(value, "true");
        // -p must still be there.
        let (name, _) = flag(s.next_flag(&reg).unwrap());
        assert_eq!(name, "p");
    }

    #[test]
    fn bool_followed_by_literal_consumes_it_as_false() {
        let reg = FlagRegistry::new();
        let mut s = stream(&["-t", "false", "busybox"]);
        let (_, value) = flag(s.next_flag(&reg).unwrap());
        assert_eq!(value, "false");
        assert_eq!(s.next_flag(&reg).unwrap(), Scan::Done);
        assert_eq!(s.pop().as_deref(), Some("busybox"));
    }

    #[test]
    fn bool_followed_by_image_stays_true() {
        let reg = FlagRegistry::new();
        let mut s = stream(&["-t", "ubuntu"]);
        let (_, value) = flag(s.next_flag(&reg).unwrap());
        assert_eq!(value, "true");
        assert_eq!(s.pop().as_deref(), Some("ubuntu"));
    }

    #[test]
    fn bool_inline_literal_is_normalized() {
        let reg = FlagRegistry::new();
        let (_, value) = flag(stream(&["--tty=1"]).next_flag(&reg).unwrap());
        assert_eq!(value, "true");
        let (_, value) = flag(stream(&["--tty=False"]).next_flag(&reg).unwrap());
        assert_eq!(value, "false");
    }

    #[test]
    fn bool_inline_garbage_fails() {
        let reg = FlagRegistry::new();
        let err = stream(&["--tty=yes"]).next_flag(&reg).unwrap_err();
        assert!(matches!(err, CompileError::InvalidFlagValue { .. }));
    }
}
