use crate::chess::core::{Color, Move};
use crate::interface::wire::WireMove;

/// A single line of the text protocol.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    NewGame,
    SetPosition {
        notation: String,
        turn: Color,
    },
    Moves,
    Play(Move),
    Render,
    Record,
    Resign,
    Draw,
    Show,
    Version,
    Quit,
    Unknown(String),
}

fn parse_position(input: &str, parts: &[&str]) -> Command {
    let turn = match parts.get(2) {
        None => Color::White,
        Some(turn) => match Color::try_from(*turn) {
            Ok(turn) => turn,
            Err(_) => return Command::Unknown(input.to_string()),
        },
    };
    match parts {
        [_, notation] | [_, notation, _] => Command::SetPosition {
            notation: (*notation).to_string(),
            turn,
        },
        _ => Command::Unknown(input.to_string()),
    }
}

fn parse_move(input: &str, arguments: &str) -> Command {
    let parsed = if arguments.starts_with('{') {
        serde_json::from_str::<WireMove>(arguments)
            .map(Move::from)
            .map_err(anyhow::Error::from)
    } else {
        Move::try_from(arguments)
    };
    parsed.map_or_else(|_| Command::Unknown(input.to_string()), Command::Play)
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        let parts: Vec<&str> = input.split_whitespace().collect();

        let Some(&command) = parts.first() else {
            return Self::Unknown(input.to_string());
        };
        let arguments = input[command.len()..].trim_start();

        match command {
            "new" if parts.len() == 1 => Self::NewGame,
            "position" => parse_position(input, &parts),
            "moves" => Self::Moves,
            "move" => parse_move(input, arguments),
            "render" => Self::Render,
            "record" => Self::Record,
            "resign" => Self::Resign,
            "draw" => Self::Draw,
            "d" => Self::Show,
            "version" => Self::Version,
            "quit" => Self::Quit,
            _ => Self::Unknown(input.to_string()),
        }
    }
}
