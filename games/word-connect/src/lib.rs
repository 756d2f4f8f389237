use wasm_bindgen::prelude::*;
use wheel_engine::*;

mod board;
mod board_view;
mod cue;
mod game;
mod level;
mod wheel;
mod wheel_view;
use game::WordConnect;

wheel_web::export_game!(WordConnect, "word-connect");
