//! Validate every Clausewitz file under the given paths.
//!
//! Walks each argument recursively and parses every `.txt` file it finds.
//! A parse failure prints the error's detail block and checking continues
//! with the next file; the exit status reports whether any file failed.
//!
//! ## Sample output
//!
//! ```text
//! invalid value at binding (line: 12)
//! Token: '}'
//! Line: 12
//! File: events/war.txt
//! 214 file(s) checked, 1 failure(s)
//! ```

use std::{
    env, error, fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

fn main() -> ExitCode {
    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: check <path>...");
        return ExitCode::from(2);
    }

    let cwd = env::current_dir().ok();
    let mut checked = 0usize;
    let mut failures = 0usize;
    for path in &paths {
        if let Err(e) = visit(path, cwd.as_deref(), &mut checked, &mut failures) {
            eprintln!("{}: {}", path.display(), e);
            failures += 1;
        }
    }

    println!("{} file(s) checked, {} failure(s)", checked, failures);
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn visit(
    path: &Path,
    cwd: Option<&Path>,
    checked: &mut usize,
    failures: &mut usize,
) -> Result<(), Box<dyn error::Error>> {
    if fs::metadata(path)?.is_dir() {
        for entry in fs::read_dir(path)? {
            visit(&entry?.path(), cwd, checked, failures)?;
        }

        return Ok(());
    }

    if path.extension().map_or(true, |ext| ext != "txt") {
        return Ok(());
    }

    *checked += 1;
    let raw = fs::read(path)?;
    let data = String::from_utf8_lossy(&raw);
    let address = cwd
        .and_then(|base| path.strip_prefix(base).ok())
        .unwrap_or(path)
        .display()
        .to_string();

    if let Err(e) = moltke::parse_file(&data, &address) {
        eprintln!("{}\n{}", e, e.detail());
        *failures += 1;
    }

    Ok(())
}
