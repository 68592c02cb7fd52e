/// Front-end independent key events
use crate::selection::{Direction, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub action: KeyAction,
    pub shift: bool,
}

impl KeyInput {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Press,
            shift: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// What a key means, before any state is consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(Target),
    Nudge(Direction),
    Launch,
    Quit,
}

impl Key {
    pub fn command(self) -> Option<Command> {
        let command = match self {
            Key::Char(c) => match c.to_ascii_lowercase() {
                'c' => Command::Select(Target::Camera),
                'b' => Command::Select(Target::Base),
                't' => Command::Select(Target::Top),
                '1' => Command::Select(Target::Arm1),
                '2' => Command::Select(Target::Arm2),
                'p' => Command::Select(Target::Pen),
                's' => Command::Launch,
                'q' => Command::Quit,
                _ => return None,
            },
            Key::Left => Command::Nudge(Direction::Left),
            Key::Right => Command::Nudge(Direction::Right),
            Key::Up => Command::Nudge(Direction::Up),
            Key::Down => Command::Nudge(Direction::Down),
            Key::Escape => Command::Quit,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_commands() {
        assert_eq!(Key::Char('p').command(), Some(Command::Select(Target::Pen)));
        // Shift+letter arrives upper-case from most terminals
        assert_eq!(Key::Char('T').command(), Some(Command::Select(Target::Top)));
        assert_eq!(Key::Char('s').command(), Some(Command::Launch));
        assert_eq!(Key::Up.command(), Some(Command::Nudge(Direction::Up)));
        assert_eq!(Key::Escape.command(), Some(Command::Quit));
        assert_eq!(Key::Char('x').command(), None);
    }
}
