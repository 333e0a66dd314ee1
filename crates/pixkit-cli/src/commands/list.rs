//! `commands` subcommand: print the command table.

use anyhow::Result;

use super::new_engine;

/// Prints each command's usage line; with `-v`, its summary as well.
pub fn run(verbose: u8) -> Result<()> {
    let engine = new_engine();
    println!("{} commands:", engine.registry().len());
    for info in engine.registry().iter() {
        if verbose > 0 {
            println!("  {}\n      {}", info.usage(), info.summary);
        } else {
            println!("  {}", info.usage());
        }
    }
    Ok(())
}
