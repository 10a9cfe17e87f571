//! Key bindings
//!
//! Browser `KeyboardEvent.key` names and single characters from the terminal
//! map onto the same engine inputs.

use crate::sim::{Direction, Input};

/// Map a key name to an engine input
pub fn parse_key(key: &str) -> Option<Input> {
    let input = match key {
        "ArrowUp" | "w" | "W" => Input::Move(Direction::Up),
        "ArrowDown" | "s" | "S" => Input::Move(Direction::Down),
        "ArrowLeft" | "a" | "A" => Input::Move(Direction::Left),
        "ArrowRight" | "d" | "D" => Input::Move(Direction::Right),
        "p" | "P" => Input::Pause,
        "r" | "R" => Input::Restart,
        "Escape" => Input::EndGame,
        _ => return None,
    };
    Some(input)
}

/// Inputs for every recognised character of a typed line, in order
pub fn parse_line(line: &str) -> Vec<Input> {
    let mut buf = [0u8; 4];
    line.chars()
        .filter_map(|c| parse_key(c.encode_utf8(&mut buf)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_keys() {
        assert_eq!(parse_key("ArrowUp"), Some(Input::Move(Direction::Up)));
        assert_eq!(parse_key("ArrowRight"), Some(Input::Move(Direction::Right)));
        assert_eq!(parse_key("P"), Some(Input::Pause));
        assert_eq!(parse_key("r"), Some(Input::Restart));
        assert_eq!(parse_key("Escape"), Some(Input::EndGame));
        assert_eq!(parse_key("Enter"), None);
        // `q` quits the terminal front end, it is not a game input
        assert_eq!(parse_key("q"), None);
    }

    #[test]
    fn test_line_of_moves() {
        assert_eq!(
            parse_line("dd s?p"),
            vec![
                Input::Move(Direction::Right),
                Input::Move(Direction::Right),
                Input::Move(Direction::Down),
                Input::Pause,
            ]
        );
    }
}
