use std::io;
use std::{env, process};

use klox::Klox;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let debug = args.iter().any(|arg| arg.as_str() == "--debug");
    let scripts: Vec<&String> = args.iter().filter(|arg| arg.as_str() != "--debug").collect();

    let mut stdout = io::stdout();
    let mut klox = Klox::new(&mut stdout);
    klox.set_debug(debug);

    match scripts.len() {
        n if n > 1 => {
            println!("Usage: klox [script]");
            process::exit(64);
        }
        1 => klox.run_file(scripts[0]),
        _ => klox.run_prompt(),
    };
}
