//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = hexgravity_cli::run() {
        eprintln!("hexgravity: {err}");
        std::process::exit(1);
    }
}
