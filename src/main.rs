use std::io::{self, Read};
use std::process::exit;

use tracing::info;

use slisp::cli::{self, CliError, Config};

fn get_input() -> io::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn fail(e: CliError) -> ! {
    eprintln!("{}", e);
    exit(e.exit_code());
}

fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_max_level(config.verbosity.level())
        .with_writer(io::stderr)
        .init();

    let reader = config.reader();
    info!(?reader, "reading standard input");

    let input = match get_input() {
        Ok(s) => s,
        Err(e) => fail(CliError::Input(e)),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli::run(&reader, &input, &mut out) {
        Ok(count) => info!(count, "done"),
        Err(e) => fail(e),
    }
}
