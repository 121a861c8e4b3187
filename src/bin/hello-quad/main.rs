use clap::Parser;
use log::LevelFilter;

mod app;
mod args;

use app::App;
use args::Args;

fn main() {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("hello_quad", LevelFilter::Info)
        .filter_module("gl_wrapper", LevelFilter::Info)
        .parse_default_env()
        .init();

    let app = match App::new(args) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(-1);
        }
    };

    if let Err(e) = app.run() {
        log::error!("{e}");
        std::process::exit(-1);
    }
}
