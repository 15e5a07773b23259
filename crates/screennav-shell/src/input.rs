//! Parsing of shell input lines.
//!
//! Each non-empty line is one command. Lines starting with `#` are comments,
//! so scripted sessions can be annotated.

use screennav_core::{Axis, Effect, LifecycleEvent, NavigationCommand};

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Navigate(NavigationCommand),
    Lifecycle(LifecycleEvent),
    Cancel(Axis),
    State,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  screen <name> [effect]   load and push a screen (effect: slide|fade|pop|none)
  back-screen              return to the previous screen
  subpage <name>           load and push a subpage
  back [n]                 go back n subpages (default 1)
  first                    return to the first subpage
  cancel <screen|subpage>  abandon the navigation loading on an axis
  deviceready | pause | resume | backbutton | resize
                           deliver a lifecycle event
  state                    print the stacks as JSON
  help                     show this text
  quit                     leave the shell";

/// Parses one input line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ShellInput>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let input = match (verb, args.as_slice()) {
        ("screen", [name]) => ShellInput::Navigate(NavigationCommand::push_screen(*name)),
        ("screen", [name, effect]) => ShellInput::Navigate(NavigationCommand::PushScreen {
            name: (*name).to_string(),
            effect: Some(effect.parse::<Effect>()?),
        }),
        ("back-screen", []) => ShellInput::Navigate(NavigationCommand::PopScreen),
        ("subpage", [name]) => ShellInput::Navigate(NavigationCommand::push_subpage(*name)),
        ("back", []) => ShellInput::Navigate(NavigationCommand::PopSubpage(1)),
        ("back", [count]) => {
            let count = count
                .parse::<usize>()
                .map_err(|_| format!("invalid count: {count}"))?;
            ShellInput::Navigate(NavigationCommand::PopSubpage(count))
        }
        ("first", []) => ShellInput::Navigate(NavigationCommand::FirstSubpage),
        ("cancel", [axis]) => ShellInput::Cancel(axis.parse::<Axis>()?),
        ("state", []) => ShellInput::State,
        ("help", []) => ShellInput::Help,
        ("quit" | "exit", []) => ShellInput::Quit,
        (event, []) => ShellInput::Lifecycle(
            event
                .parse::<LifecycleEvent>()
                .map_err(|_| format!("unknown command: {line}"))?,
        ),
        _ => return Err(format!("unknown command: {line}")),
    };
    Ok(Some(input))
}
