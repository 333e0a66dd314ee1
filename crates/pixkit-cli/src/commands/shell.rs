//! Interactive prompt over one image store.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
#[allow(unused_imports)]
use tracing::{debug, trace};

use super::script::Session;

/// Reads commands from stdin until EOF, `quit` or `exit`.
///
/// A failing command prints its error and the prompt continues.
pub fn run() -> Result<()> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        print!("pixkit> ");
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let trimmed = line.trim();
        if matches!(trimmed, "quit" | "exit") {
            break;
        }
        if let Err(e) = session.run_line(trimmed, Path::new(".")) {
            eprintln!("error: {:#}", e);
        }
    }

    debug!(artifacts = session.engine().cache().len(), "shell closed");
    Ok(())
}
