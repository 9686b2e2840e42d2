//! Cursor movement for keyboard navigation.

use block_four_rules::Position;
use crossterm::event::KeyCode;

/// Moves the cursor one cell for an arrow key. Stops at the board edge.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (d_row, d_col) = match key {
        KeyCode::Up => (-1, 0),
        KeyCode::Down => (1, 0),
        KeyCode::Left => (0, -1),
        KeyCode::Right => (0, 1),
        _ => return cursor,
    };
    cursor.step(d_row, d_col, 1).unwrap_or(cursor)
}
