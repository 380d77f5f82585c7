#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use sql_chat::app::App;
use sql_chat::utils::logging;
use tracing::error;

fn main() {
    logging::init();

    let app = App::new();
    if let Err(err) = app.run() {
        error!(error = %err, "application exited with an error");
        std::process::exit(1);
    }
}
