use twofold_core::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
    Help,
    Quit,
}

/// Translates one line typed by the player, `None` when it means nothing.
pub fn parse_command(line: &str) -> Option<Command> {
    use Command::*;
    use Direction::*;

    let command = match line.trim().to_ascii_lowercase().as_str() {
        "w" | "up" | "k" => Move(Up),
        "d" | "right" | "l" => Move(Right),
        "s" | "down" | "j" => Move(Down),
        "a" | "left" | "h" => Move(Left),
        "r" | "restart" => Restart,
        "?" | "help" => Help,
        "q" | "quit" | "exit" => Quit,
        _ => return None,
    };
    Some(command)
}

pub const HELP: &str = "\
w/a/s/d or up/left/down/right  move tiles
r                              restart
?                              this help
q                              quit";
