//! The engine drives a single game over a line-oriented text protocol: a
//! command per line on the input, responses on the output. Structured
//! responses (applied moves, rendered positions, records) are printed as
//! single-line JSON.
//!
//! [`Engine::run`] is the "main loop" of the engine which reads commands until
//! `quit` is sent or the input is closed.

use std::io::{BufRead, Write};

use crate::chess::core::Color;
use crate::chess::game::{Game, MoveError, Outcome};
use crate::engine::protocol::Command;

mod protocol;

/// The Engine owns the game and handles the commands sent by the client,
/// including I/O.
pub struct Engine<'a, R: BufRead, W: Write> {
    game: Game,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine playing `game` over the provided
    /// I/O.
    #[must_use]
    pub fn new(game: Game, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game,
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes the commands until
    /// `quit` is sent or the input is exhausted.
    ///
    /// Rejected moves and malformed commands are reported on the output and
    /// do not stop the loop.
    ///
    /// # Errors
    ///
    /// If reading the input or writing the output fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Command::NewGame => self.game = Game::classical(),
                Command::SetPosition { notation, turn } => {
                    self.handle_position(&notation, turn)?;
                },
                Command::Moves => self.handle_moves()?,
                Command::Play(next_move) => {
                    let result = self.game.process_move(next_move);
                    match result {
                        Ok(report) => self.respond(&report)?,
                        Err(e) => self.report_error(e)?,
                    }
                },
                Command::Render => {
                    let rendering = self.game.render();
                    self.respond(&rendering)?;
                },
                Command::Record => {
                    let record = self.game.to_record();
                    self.respond(&record)?;
                },
                Command::Resign => {
                    let result = self.game.resign(self.game.turn());
                    self.handle_finish(result)?;
                },
                Command::Draw => {
                    let result = self.game.agree_draw();
                    self.handle_finish(result)?;
                },
                Command::Show => self.handle_show()?,
                Command::Version => {
                    writeln!(
                        self.output,
                        "{} {}",
                        env!("CARGO_PKG_NAME"),
                        crate::engine_version()
                    )?;
                },
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(self.output, "info string Unsupported command: {command}")?;
                },
            }
            self.output.flush()?;
        }
        Ok(())
    }

    #[cfg(test)]
    const fn game(&self) -> &Game {
        &self.game
    }

    /// Replaces the game with the one starting from the given position. An
    /// unusable position is reported and the current game is kept.
    fn handle_position(&mut self, notation: &str, turn: Color) -> anyhow::Result<()> {
        match Game::from_notation(notation, turn) {
            Ok(game) => self.game = game,
            Err(e) => {
                log::warn!("Rejected position {notation}: {e:#}");
                writeln!(self.output, "info string Incorrect position: {e:#}")?;
            },
        }
        Ok(())
    }

    /// Lists the legal moves of the side to move, terminated by `end`.
    fn handle_moves(&mut self) -> anyhow::Result<()> {
        for next_move in self.game.legal_moves() {
            writeln!(self.output, "{next_move}")?;
        }
        writeln!(self.output, "end")?;
        Ok(())
    }

    fn handle_finish(&mut self, result: Result<Outcome, MoveError>) -> anyhow::Result<()> {
        match result {
            Ok(outcome) => self.respond(&outcome),
            Err(e) => self.report_error(e),
        }
    }

    fn handle_show(&mut self) -> anyhow::Result<()> {
        write!(self.output, "{:?}", self.game.board())?;
        writeln!(self.output, "{} to move", self.game.turn())?;
        Ok(())
    }

    fn respond(&mut self, response: &impl serde::Serialize) -> anyhow::Result<()> {
        serde_json::to_writer(&mut *self.output, response)?;
        writeln!(self.output)?;
        Ok(())
    }

    fn report_error(&mut self, error: MoveError) -> anyhow::Result<()> {
        match error {
            MoveError::IllegalMove(_) => writeln!(self.output, "error illegal move")?,
            MoveError::GameFinished => writeln!(self.output, "error game finished")?,
            MoveError::WrongTurn { .. } => writeln!(self.output, "error {error}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(commands: &str) -> (String, Game) {
        let mut input = commands.as_bytes();
        let mut output = Vec::new();
        let mut engine = Engine::new(Game::classical(), &mut input, &mut output);
        engine.run().unwrap();
        let game = engine.game().clone();
        (String::from_utf8(output).unwrap(), game)
    }

    #[test]
    fn opening_moves() {
        let (output, _) = run("moves\n");
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 17);
        assert_eq!(lines.last(), Some(&"end"));
        assert!(lines.contains(&"B1 C3"));
        assert!(lines.contains(&"C1 E3"));
    }

    #[test]
    fn play_moves() {
        let (output, game) = run(
            "move E2 E3\n\
             move E2 E4\n\
             move {\"start\":{\"col\":3,\"row\":6},\"destination\":{\"col\":3,\"row\":5}}\n",
        );
        assert_eq!(game.history().len(), 2);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(r#""move":"E2 E3""#));
        assert!(lines[0].contains(r#""outcome":null"#));
        assert_eq!(lines[1], "error illegal move");
        assert!(lines[2].contains(r#""move":"D7 D6""#));
    }

    #[test]
    fn position_and_quit() {
        let (output, game) = run(
            "position WSHA1|BSHH8|BRHA2|\n\
             move A1 A2\n\
             move H8 H7\n\
             quit\n\
             new\n",
        );
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"position":"WSHA2|BSHH8|","move":"A1 A2","outcome":{"result":"draw"}}"#,
                "error game finished",
            ]
        );
        assert!(game.has_finished());
    }

    #[test]
    fn incorrect_position_keeps_game() {
        let (output, game) = run("position WSHD1|\nposition WSHD1|BSHD9| white\n");
        assert_eq!(output.lines().count(), 2);
        assert!(output
            .lines()
            .all(|line| line.starts_with("info string Incorrect position")));
        assert_eq!(game, Game::classical());
    }

    #[test]
    fn resign_and_draw() {
        let (output, game) = run("resign\ndraw\n");
        assert_eq!(
            output,
            "{\"result\":\"win\",\"winner\":\"BLACK\"}\nerror game finished\n"
        );
        assert!(game.has_finished());
        let (output, _) = run("draw\n");
        assert_eq!(output, "{\"result\":\"draw\"}\n");
    }

    #[test]
    fn unknown_command() {
        let (output, _) = run("go depth 10\n\n");
        assert_eq!(output, "info string Unsupported command: go depth 10\n");
    }
}
