//! Utility to rewrite a Clausewitz document from stdin to stdout in
//! canonical form.
//!
//! Useful to normalize hand-edited game files before diffing them against
//! generated ones. Comments survive the rewrite.

use std::{
    error,
    io::{self, BufWriter, Read, Write},
};

fn main() -> Result<(), Box<dyn error::Error>> {
    let mut data = String::new();
    io::stdin().lock().read_to_string(&mut data)?;

    let file = moltke::parse_file(&data, "<stdin>")?;

    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);
    moltke::write(&file, &mut writer)?;
    writer.flush()?;

    Ok(())
}
