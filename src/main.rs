use anyhow::Result;

use pingpong_ranking::cli::Command;
use pingpong_ranking::{handle_init, handle_seed, handle_serve, handle_sweep, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Sweep => handle_sweep(),
        Command::Init => handle_init(),
        Command::Seed => handle_seed(),
    }
}
