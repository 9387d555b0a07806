use clap::Parser;
use clipmenu_core::runtime::{run_with_options, CliOptions};

fn main() {
    let options = match CliOptions::try_parse() {
        Ok(options) => options,
        Err(error) if error.use_stderr() => {
            eprintln!("[clipmenu-core] {error}");
            std::process::exit(2);
        }
        // --help and --version
        Err(error) => error.exit(),
    };

    if let Err(error) = run_with_options(options) {
        eprintln!("[clipmenu-core] runtime failed: {error}");
        std::process::exit(1);
    }
}
