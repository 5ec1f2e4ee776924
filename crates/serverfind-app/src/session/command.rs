//! Line commands accepted by the interactive session.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Submit the query; with an argument, replace the query input first.
    Search(Option<String>),
    Next,
    Clear,
    Color(String),
    AutoScroll(bool),
    Advanced(bool),
    Reload,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search [query]        submit the query (optionally replacing it)
  next                  scroll to the next match
  clear                 clear the query and highlights
  color <color>         set the highlight color (#rrggbb or rgb()/rgba())
  autoscroll on|off     scroll to the first match after a search
  advanced on|off       match names containing every query letter
  reload                reload the page
  status                show the current state
  quit                  exit";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" | "find" => {
            ReplCommand::Search((!rest.is_empty()).then(|| rest.to_string()))
        }
        "next" | "n" => ReplCommand::Next,
        "clear" => ReplCommand::Clear,
        "color" | "colour" => {
            if rest.is_empty() {
                return Err("usage: color <color>".into());
            }
            ReplCommand::Color(rest.to_string())
        }
        "autoscroll" => ReplCommand::AutoScroll(parse_switch("autoscroll", rest)?),
        "advanced" => ReplCommand::Advanced(parse_switch("advanced", rest)?),
        "reload" => ReplCommand::Reload,
        "status" => ReplCommand::Status,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("unknown command {other:?}; type `help`")),
    };
    Ok(Some(command))
}

fn parse_switch(name: &str, value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("usage: {name} on|off")),
    }
}
