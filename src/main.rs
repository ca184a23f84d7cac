use std::io;
use std::process::ExitCode;

use uci_chess_engine::uci::{EngineConfig, UciLogger, UciSession};

fn main() -> ExitCode {
    if let Err(e) = UciLogger::init() {
        eprintln!("failed to install logger: {e}");
    }

    let mut session = UciSession::new(EngineConfig::default(), io::stdout());
    let result = session.greet().and_then(|()| session.run(io::stdin().lock()));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
