//! Command-line console and REPL
//!
//! A small host for the store: reads commands, applies them through the
//! store's public API, and prints a line whenever the debounced change
//! notification fires.

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::KnobsError;
use crate::store::{Knob, KnobStore, UNGROUPED};
use crate::view::group_views;

const HELP: &str = "\
set <group> <name> <json> [type]  store a knob (group '-' = ungrouped)
get <group> <name>                read a knob and mark it used
has <group> <name>                check whether a knob exists
list                              show every knob
tabs [used]                       show groups as panel tabs
unused                            mark every knob unused
reset                             drop every knob
quit                              leave the console";

/// Console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set {
        group: String,
        name: String,
        value: Value,
        knob_type: Option<String>,
    },
    Get { group: String, name: String },
    Has { group: String, name: String },
    List,
    Tabs { used_only: bool },
    MarkUnused,
    Reset,
    Help,
    Quit,
}

/// `-` stands for the ungrouped bucket
fn group_arg(arg: &str) -> String {
    if arg == "-" {
        UNGROUPED.to_string()
    } else {
        arg.to_string()
    }
}

/// Infer a knob type from a JSON value
fn infer_type(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null | Value::String(_) => "text",
    }
}

impl Command {
    /// Parse one console line
    pub fn parse(line: &str) -> Result<Self, KnobsError> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(KnobsError::Command("empty line".to_string()));
        };
        let args: Vec<&str> = parts.collect();

        let path = |usage: &str| -> Result<(String, String), KnobsError> {
            match args.as_slice() {
                [group, name] => Ok((group_arg(group), name.to_string())),
                _ => Err(KnobsError::Command(format!("usage: {}", usage))),
            }
        };

        match verb {
            "set" => {
                let [group, name, value, rest @ ..] = args.as_slice() else {
                    return Err(KnobsError::Command(
                        "usage: set <group> <name> <json> [type]".to_string(),
                    ));
                };
                let knob_type = match rest {
                    [] => None,
                    [knob_type] => Some(knob_type.to_string()),
                    _ => {
                        return Err(KnobsError::Command(
                            "usage: set <group> <name> <json> [type]".to_string(),
                        ))
                    }
                };
                Ok(Command::Set {
                    group: group_arg(group),
                    name: name.to_string(),
                    value: serde_json::from_str(value)?,
                    knob_type,
                })
            }
            "get" => path("get <group> <name>").map(|(group, name)| Command::Get { group, name }),
            "has" => path("has <group> <name>").map(|(group, name)| Command::Has { group, name }),
            "list" | "ls" => Ok(Command::List),
            "tabs" => match args.as_slice() {
                [] => Ok(Command::Tabs { used_only: false }),
                ["used"] => Ok(Command::Tabs { used_only: true }),
                _ => Err(KnobsError::Command("usage: tabs [used]".to_string())),
            },
            "unused" => Ok(Command::MarkUnused),
            "reset" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(KnobsError::Command(format!("unknown command '{}'", other))),
        }
    }
}

fn describe(knob: &Knob) -> String {
    let marker = if knob.used { "*" } else { " " };
    format!("{} {} ({}) = {}", marker, knob.name, knob.knob_type, knob.value)
}

/// Apply a command to the store and render its output
pub fn execute(store: &KnobStore, command: &Command) -> String {
    match command {
        Command::Set {
            group,
            name,
            value,
            knob_type,
        } => {
            let knob_type = knob_type
                .clone()
                .unwrap_or_else(|| infer_type(value).to_string());
            let knob = Knob::new(name.clone(), knob_type, value.clone()).in_group(group.clone());
            store.set(group, name, knob);
            "ok".to_string()
        }
        Command::Get { group, name } => match store.get(group.as_str(), name) {
            Some(knob) => describe(&knob),
            None => "(none)".to_string(),
        },
        Command::Has { group, name } => store.has(group, name).to_string(),
        Command::List => {
            let groups = store.get_all();
            if groups.is_empty() {
                return "No knobs found".to_string();
            }
            let mut lines = Vec::new();
            for (group_id, group) in groups.iter() {
                lines.push(format!("[{}]", group_id));
                lines.extend(group.values().map(|knob| format!("  {}", describe(knob))));
            }
            lines.join("\n")
        }
        Command::Tabs { used_only } => {
            let views = group_views(&store.get_all(), *used_only);
            if views.is_empty() {
                return "No knobs found".to_string();
            }
            views
                .iter()
                .map(|view| format!("{} ({} knobs)", view.title, view.knobs.len()))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Command::MarkUnused => {
            store.mark_all_unused();
            "ok".to_string()
        }
        Command::Reset => {
            store.reset();
            "ok".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    }
}

/// Run the interactive console until `quit` or end of input
pub async fn run_repl(store: KnobStore) -> Result<()> {
    let notifier = store.subscribe_fn(|| {
        println!("{}", "knobs changed".dimmed());
    });

    // Readline blocks; keep it off the async workers so the debounce timer keeps running.
    let console_store = store.clone();
    let outcome = tokio::task::spawn_blocking(move || console_loop(&console_store)).await?;

    store.unsubscribe(&notifier);
    outcome
}

fn console_loop(store: &KnobStore) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("knobs> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match Command::parse(line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        debug!(?command, "Executing console command");
                        println!("{}", execute(store, &command));
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                warn!("Console read failed: {}", e);
                break;
            }
        }
    }

    Ok(())
}
