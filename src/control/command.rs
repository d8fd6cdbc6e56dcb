//! Control command parsing.
//!
//! One line in, one typed command (or a usage error) out. This is the only
//! validation gate: nothing malformed reaches the queue.

use crate::error::CommandError;

/// A validated instruction for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `msg <target> <text>`
    Message { target: String, body: String },
    /// `join <target>`
    Join { target: String },
    /// `part <target>`
    Part { target: String },
    /// `nick <newnick>`
    SetNick { nick: String },
}

impl Command {
    /// Control-protocol verb for this command.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Message { .. } => "msg",
            Self::Join { .. } => "join",
            Self::Part { .. } => "part",
            Self::SetNick { .. } => "nick",
        }
    }
}

/// Parse one control line (without its terminator).
///
/// The line is split on spaces into at most three fields; the third keeps
/// any embedded spaces. An empty target or nick counts as missing; an empty
/// message body is sent as is.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut parts = line.splitn(3, ' ');
    let verb = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    match verb {
        "msg" => match args.as_slice() {
            [target, body] if !target.is_empty() => Ok(Command::Message {
                target: target.to_string(),
                body: body.to_string(),
            }),
            _ => Err(CommandError::Usage("msg [target] [msg]")),
        },
        "join" => single(&args, "join [target]").map(|target| Command::Join { target }),
        "part" => single(&args, "part [target]").map(|target| Command::Part { target }),
        "nick" => single(&args, "nick [new nick]").map(|nick| Command::SetNick { nick }),
        other => Err(CommandError::Invalid(other.to_string())),
    }
}

fn single(args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    match args {
        [arg] if !arg.is_empty() => Ok(arg.to_string()),
        _ => Err(CommandError::Usage(usage)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msg_keeps_embedded_whitespace() {
        assert_eq!(
            parse_command("msg #test hello world"),
            Ok(Command::Message {
                target: "#test".to_string(),
                body: "hello world".to_string(),
            })
        );
        assert_eq!(
            parse_command("msg alice  two  spaces "),
            Ok(Command::Message {
                target: "alice".to_string(),
                body: " two  spaces ".to_string(),
            })
        );
    }

    #[test]
    fn msg_accepts_empty_body() {
        assert_eq!(
            parse_command("msg #test "),
            Ok(Command::Message {
                target: "#test".to_string(),
                body: String::new(),
            })
        );
    }

    #[test]
    fn single_argument_commands() {
        assert_eq!(
            parse_command("join #rust"),
            Ok(Command::Join {
                target: "#rust".to_string()
            })
        );
        assert_eq!(
            parse_command("part #rust"),
            Ok(Command::Part {
                target: "#rust".to_string()
            })
        );
        assert_eq!(
            parse_command("nick glenda"),
            Ok(Command::SetNick {
                nick: "glenda".to_string()
            })
        );
    }

    #[test]
    fn wrong_arity_is_usage_error() {
        let cases = [
            ("msg", "Usage: msg [target] [msg]"),
            ("msg #test", "Usage: msg [target] [msg]"),
            ("msg  hi", "Usage: msg [target] [msg]"),
            ("join", "Usage: join [target]"),
            ("join ", "Usage: join [target]"),
            ("join #a #b", "Usage: join [target]"),
            ("part", "Usage: part [target]"),
            ("part #a extra words", "Usage: part [target]"),
            ("nick", "Usage: nick [new nick]"),
            ("nick a b", "Usage: nick [new nick]"),
        ];
        for (line, expected) in cases {
            let err = parse_command(line).unwrap_err();
            assert_eq!(err.to_string(), expected, "line {line:?}");
        }
    }

    #[test]
    fn unknown_verb_is_echoed() {
        let err = parse_command("frobnicate x").unwrap_err();
        assert_eq!(err, CommandError::Invalid("frobnicate".to_string()));
        assert_eq!(err.to_string(), "Invalid command frobnicate.");

        // verbs are case-sensitive
        assert!(matches!(
            parse_command("JOIN #rust"),
            Err(CommandError::Invalid(v)) if v == "JOIN"
        ));
        assert_eq!(
            parse_command("").unwrap_err().to_string(),
            "Invalid command ."
        );
    }

    #[test]
    fn debug_dump_names_fields() {
        let cmd = parse_command("msg #test hi").unwrap();
        assert_eq!(
            format!("{cmd:?}"),
            r##"Message { target: "#test", body: "hi" }"##
        );
        assert_eq!(cmd.verb(), "msg");
    }
}
