use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use xception::{compile_dictionary, hex};

/// Compile a CTS256A-AL2 exception-word dictionary into an Intel hex
/// EPROM image
#[derive(Parser)]
#[command(name = "xception", version)]
struct Cli {
    /// Dictionary source file (stdin when omitted)
    input: Option<PathBuf>,

    /// Write the hex records here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn read_source(cli: &Cli) -> io::Result<String> {
    match &cli.input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src)?;
            Ok(src)
        }
    }
}

fn write_records(cli: &Cli, text: &str) -> io::Result<()> {
    match &cli.output {
        Some(path) => fs::write(path, text),
        None => io::stdout().write_all(text.as_bytes()),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let src = match read_source(&cli) {
        Ok(src) => src,
        Err(err) => {
            eprintln!("cannot read dictionary: {}", err);
            process::exit(1);
        }
    };

    let image = match compile_dictionary(&src) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let text = hex::serialize(image.as_bytes(), 0);
    if let Err(err) = write_records(&cli, &text) {
        eprintln!("cannot write hex records: {}", err);
        process::exit(1);
    }
}
