pub mod classify;
pub mod eco;
pub mod game_data;
pub mod pgn;
pub mod weakness;
