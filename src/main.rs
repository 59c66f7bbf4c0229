use std::process;

mod asset;
mod game;
mod input;
mod renderer;

fn main() {
    env_logger::init();

    if let Err(err) = game::run() {
        log::error!("initialization failed: {err}");
        process::exit(-1);
    }
}
