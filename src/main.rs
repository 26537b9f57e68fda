use std::process::ExitCode;

use batch_move::output as out;
use batch_move::{BatchError, cli};

mod app;
mod logging;

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(code) => code,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            match e.downcast_ref::<BatchError>() {
                Some(be) => app::exit_code_for(be),
                None => ExitCode::FAILURE,
            }
        }
    }
}
