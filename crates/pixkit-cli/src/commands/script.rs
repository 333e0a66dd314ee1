//! Script execution.
//!
//! A script is one command per line. Tokens are separated by whitespace,
//! `#` starts a comment, `key=value` tokens are keywords. `run <file>`
//! includes another script; relative paths resolve against the including
//! script's directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pixkit_engine::Engine;
#[allow(unused_imports)]
use tracing::{debug, info, trace};

use super::new_engine;

/// Nesting limit for `run` inside scripts.
const MAX_DEPTH: usize = 16;

/// Runs every script in order against one engine.
pub fn run(scripts: &[PathBuf]) -> Result<()> {
    let mut session = Session::new();
    for script in scripts {
        session.run_file(script)?;
    }
    Ok(())
}

/// Runs one command against a fresh engine.
pub fn exec(command: &str, args: &[String]) -> Result<()> {
    let mut session = Session::new();
    session.run_tokens(command, args, Path::new("."))
}

/// Engine plus script bookkeeping.
pub struct Session {
    engine: Engine,
    depth: usize,
}

impl Session {
    /// Session over a new engine with `load`/`save` registered.
    pub fn new() -> Self {
        Self {
            engine: new_engine(),
            depth: 0,
        }
    }

    /// The engine commands run against.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Runs a script file.
    pub fn run_file(&mut self, path: &Path) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            bail!("scripts nested deeper than {} levels at {}", MAX_DEPTH, path.display());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        info!(script = %path.display(), "running script");

        self.depth += 1;
        let result = text.lines().enumerate().try_for_each(|(i, line)| {
            self.run_line(line, &base)
                .with_context(|| format!("{}:{}: {}", path.display(), i + 1, line.trim()))
        });
        self.depth -= 1;
        result
    }

    /// Runs one script line; blank and comment-only lines do nothing.
    pub fn run_line(&mut self, line: &str, base: &Path) -> Result<()> {
        let code = line.split('#').next().unwrap_or("");
        let mut tokens = code.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();
        self.run_tokens(command, args.as_slice(), base)
    }

    /// Runs `command` with text arguments.
    pub fn run_tokens<S: AsRef<str>>(&mut self, command: &str, args: &[S], base: &Path) -> Result<()> {
        trace!(command, args = args.len(), "run_tokens");
        if command == "run" {
            let [script] = args else {
                bail!("run expects exactly one script path");
            };
            return self.run_file(&base.join(script.as_ref()));
        }
        self.engine.execute_tokens(command, args)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixkit_core::Image;

    fn write_png(dir: &Path, name: &str, image: &Image) -> PathBuf {
        let path = dir.join(name);
        pixkit_io::write(&path, image).unwrap();
        path
    }

    #[test]
    fn test_script_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let src = Image::from_fn(8, 8, 3, |x, y| [(x * 30) as u8, (y * 30) as u8, 90, 0]).unwrap();
        write_png(dir.path(), "in.png", &src);
        let script = dir.path().join("edit.pk");
        fs::write(
            &script,
            format!(
                "# brighten then flip\nload {0}/in.png img\n\nbrighten 10 img b   # comment\nhorizontal-flip b f\nhistogram f h\nsave f {0}/out.ppm\nsave h {0}/hist.png\n",
                dir.path().display()
            ),
        )
        .unwrap();

        let mut session = Session::new();
        session.run_file(&script).unwrap();

        let out = pixkit_io::read(dir.path().join("out.ppm")).unwrap();
        assert_eq!(out.rgb(0, 0), [220, 10, 100]);
        let plot = pixkit_io::read(dir.path().join("hist.png")).unwrap();
        assert_eq!(plot.dimensions(), (256, 256));
        assert!(session.engine().is_histogram("h"));
    }

    #[test]
    fn test_nested_run_is_relative() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_png(&sub, "a.png", &Image::filled(2, 2, &[5, 5, 5]).unwrap());
        fs::write(sub.join("inner.pk"), format!("load {}/a.png a\n", sub.display())).unwrap();
        fs::write(dir.path().join("outer.pk"), "run sub/inner.pk\nsepia a s\n").unwrap();

        let mut session = Session::new();
        session.run_file(&dir.path().join("outer.pk")).unwrap();
        assert!(session.engine().get_image("s").is_ok());
    }

    #[test]
    fn test_error_names_line() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("bad.pk");
        fs::write(&script, "# nothing yet\nblur missing out\n").unwrap();
        let err = Session::new().run_file(&script).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("bad.pk:2"), "{}", msg);
        assert!(msg.contains("no image named 'missing'"), "{}", msg);
    }

    #[test]
    fn test_recursive_script_stops() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("loop.pk");
        fs::write(&script, "run loop.pk\n").unwrap();
        assert!(Session::new().run_file(&script).is_err());
    }

    #[test]
    fn test_unknown_command() {
        let mut session = Session::new();
        let err = session.run_line("frobnicate a b", Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("unknown command"));
    }
}
