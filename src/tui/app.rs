//! Offline application state.

use super::input::move_cursor;
use block_four_rules::{Game, MoveError, Outcome, Position};
use crossterm::event::KeyCode;
use tracing::{debug, info};

/// Same-device match state.
#[derive(Debug, Clone)]
pub struct App {
    game: Game,
    cursor: Position,
    status_message: String,
    quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new application with the cursor on the center.
    pub fn new() -> Self {
        let game = Game::new();
        let status_message = turn_status(&game);
        Self {
            game,
            cursor: Position::CENTER,
            status_message,
            quit: false,
        }
    }

    /// Gets the current game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Cell under the cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// True once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Applies one key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("User quit");
                self.quit = true;
            }
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Enter | KeyCode::Char(' ') => self.place_at_cursor(),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key);
            }
            _ => {}
        }
    }

    /// Places a piece for the player to move at the cursor.
    pub fn place_at_cursor(&mut self) {
        match self.game.place(self.cursor) {
            Ok(placement) => {
                debug!(mv = %placement.mv, "Offline placement");
                self.status_message = match placement.outcome {
                    Some(outcome) => outcome_banner(outcome),
                    None => turn_status(&self.game),
                };
            }
            Err(e) => self.status_message = alert(&e),
        }
    }

    /// Takes back the latest move.
    pub fn undo(&mut self) {
        match self.game.undo() {
            Ok(undone) => {
                debug!(mv = %undone.mv, "Offline undo");
                self.cursor = undone.mv.position;
                self.status_message = turn_status(&self.game);
            }
            Err(e) => self.status_message = alert(&e),
        }
    }

    /// Starts a fresh match.
    pub fn restart(&mut self) {
        debug!("Restarting game");
        *self = Self::new();
    }
}

fn turn_status(game: &Game) -> String {
    let player = game.to_move();
    if game.center_placed() {
        format!(
            "{} to move ({} left)",
            player.to_string().to_uppercase(),
            game.supply().remaining(player)
        )
    } else {
        format!("{} places the center block", player.to_string().to_uppercase())
    }
}

fn outcome_banner(outcome: Outcome) -> String {
    match outcome {
        Outcome::Winner(player) => format!(
            "{} Wins! Press 'r' to restart or 'q' to quit.",
            player.to_string().to_uppercase()
        ),
        Outcome::Draw => "Draw! Press 'r' to restart or 'q' to quit.".to_string(),
    }
}

/// Short alert text for a refused action.
fn alert(error: &MoveError) -> String {
    match error {
        MoveError::Occupied(_) => "occupied".to_string(),
        MoveError::OffFrontier(_) => "cannot place here".to_string(),
        MoveError::GameOver => "game is over, press 'r' to restart".to_string(),
        other => other.to_string(),
    }
}
