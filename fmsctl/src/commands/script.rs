use fms_core::PlanIndex;

use crate::{AppError, Result};

/// One line of an editing script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    CityPair {
        origin: String,
        destination: String,
        alternate: Option<String>,
    },
    OriginRunway(String),
    DestinationRunway(String),
    Departure(String),
    DepartureTransition(String),
    Arrival(String),
    ArrivalTransition(String),
    Approach(String),
    ApproachVia(String),
    Commit,
    Discard,
    Show,
    Slots,
    Create(PlanIndex),
    Delete(PlanIndex),
    Copy { from: PlanIndex, to: PlanIndex },
    Swap { a: PlanIndex, b: PlanIndex },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: ScriptCommand,
}

/// Parses a whole script, skipping blank lines and `#` comments.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (offset, raw) in source.lines().enumerate() {
        let line = offset + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let command =
            parse_command(content).map_err(|message| AppError::Script { line, message })?;
        lines.push(ScriptLine { line, command });
    }
    Ok(lines)
}

fn parse_command(content: &str) -> std::result::Result<ScriptCommand, String> {
    let words: Vec<&str> = content.split_whitespace().collect();
    let (keyword, args) = match words.split_first() {
        Some((keyword, args)) => (keyword.to_ascii_lowercase(), args),
        None => return Err("empty command".to_string()),
    };

    let command = match (keyword.as_str(), args) {
        ("city-pair", [origin, destination]) => ScriptCommand::CityPair {
            origin: origin.to_string(),
            destination: destination.to_string(),
            alternate: None,
        },
        ("city-pair", [origin, destination, alternate]) => ScriptCommand::CityPair {
            origin: origin.to_string(),
            destination: destination.to_string(),
            alternate: Some(alternate.to_string()),
        },
        ("origin-runway", [ident]) => ScriptCommand::OriginRunway(ident.to_string()),
        ("destination-runway", [ident]) => ScriptCommand::DestinationRunway(ident.to_string()),
        ("departure", [ident]) => ScriptCommand::Departure(ident.to_string()),
        ("departure-transition", [ident]) => ScriptCommand::DepartureTransition(ident.to_string()),
        ("arrival", [ident]) => ScriptCommand::Arrival(ident.to_string()),
        ("arrival-transition", [ident]) => ScriptCommand::ArrivalTransition(ident.to_string()),
        ("approach", [ident]) => ScriptCommand::Approach(ident.to_string()),
        ("approach-via", [ident]) => ScriptCommand::ApproachVia(ident.to_string()),
        ("commit", []) => ScriptCommand::Commit,
        ("discard", []) => ScriptCommand::Discard,
        ("show", []) => ScriptCommand::Show,
        ("slots", []) => ScriptCommand::Slots,
        ("create", [slot]) => ScriptCommand::Create(slot.parse()?),
        ("delete", [slot]) => ScriptCommand::Delete(slot.parse()?),
        ("copy", [from, to]) => ScriptCommand::Copy {
            from: from.parse()?,
            to: to.parse()?,
        },
        ("swap", [a, b]) => ScriptCommand::Swap {
            a: a.parse()?,
            b: b.parse()?,
        },
        (keyword, args) => {
            return Err(format!(
                "unrecognised command `{keyword}` with {} argument(s)",
                args.len()
            ))
        }
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_skips_comments() {
        let script = "\
# bench session
city-pair CYUL LOWI LOWG
origin-runway RW06R   # preferred

copy active secondary-0
commit
";
        let lines = parse_script(script).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            ScriptLine {
                line: 2,
                command: ScriptCommand::CityPair {
                    origin: "CYUL".into(),
                    destination: "LOWI".into(),
                    alternate: Some("LOWG".into()),
                },
            }
        );
        assert_eq!(lines[1].command, ScriptCommand::OriginRunway("RW06R".into()));
        assert_eq!(
            lines[2].command,
            ScriptCommand::Copy {
                from: PlanIndex::Active,
                to: PlanIndex::Secondary(0),
            }
        );
        assert_eq!(lines[3].command, ScriptCommand::Commit);
    }

    #[test]
    fn reports_line_of_bad_command() {
        let err = parse_script("show\ncommit now\n").unwrap_err();
        match err {
            AppError::Script { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("commit"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_slot() {
        assert!(matches!(
            parse_script("create backup"),
            Err(AppError::Script { line: 1, .. })
        ));
    }
}
