/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "employees",
    aliases: &["e", "emp", "reload"],
    description: "Reload the employee table",
  },
  Command {
    name: "add",
    aliases: &["a", "new", "create"],
    description: "Add an employee",
  },
  Command {
    name: "columns",
    aliases: &["c", "cols"],
    description: "Show or hide columns",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit roster",
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    let priority = if cmd.name == input_lower {
      0
    } else if cmd.aliases.contains(&input_lower.as_str()) {
      1
    } else if cmd.name.starts_with(&input_lower) {
      2
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      3
    } else if cmd.name.contains(&input_lower) {
      4
    } else if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      5
    } else {
      continue;
    };
    matches.push((cmd, priority));
  }

  // Stable sort keeps declaration order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// The command an input resolves to: the chosen suggestion if there is one
pub fn resolve(input: &str, selected: usize) -> Option<&'static Command> {
  let suggestions = get_suggestions(input);
  suggestions
    .get(selected)
    .or_else(|| suggestions.first())
    .copied()
}
