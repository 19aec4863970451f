//! Triple Stack Skin Maker - command-line front end

use std::process::ExitCode;

use triplestack::cli;

fn main() -> ExitCode {
    cli::run()
}
