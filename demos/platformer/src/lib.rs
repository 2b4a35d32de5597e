use wasm_bindgen::prelude::*;
use leap_engine::*;

mod bullet;
mod enemy;
mod game;
mod hud;
mod player;

use game::Platformer;

leap_web::export_game!(Platformer, "platformer");
