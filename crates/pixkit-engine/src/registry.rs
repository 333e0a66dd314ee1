//! Command registry and dispatcher.
//!
//! The registry is the single table mapping a command name to its
//! [`Signature`], accepted keywords, summary and constructor. Running a
//! command always goes through [`CommandRegistry::execute`]:
//!
//! 1. resolve the name ([`EngineError::UnknownCommand`] otherwise)
//! 2. validate the arguments against the signature
//! 3. build the command from arguments and cache
//! 4. run it, letting it store its results
//!
//! Errors from steps 2-4 are wrapped with the command name.
//!
//! # Extending
//!
//! Collaborators add commands by registering a [`CommandInfo`] whose
//! constructor is a plain function pointer:
//!
//! ```rust
//! use pixkit_engine::args::{ArgumentType, ArgumentWrapper, Signature};
//! use pixkit_engine::cache::ArtifactCache;
//! use pixkit_engine::registry::{Command, CommandInfo, CommandRegistry};
//! use pixkit_engine::EngineResult;
//!
//! struct Forget(String);
//!
//! impl Command for Forget {
//!     fn run(self: Box<Self>, _cache: &mut ArtifactCache) -> EngineResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! fn build(args: &ArgumentWrapper, _cache: &ArtifactCache) -> EngineResult<Box<dyn Command>> {
//!     Ok(Box::new(Forget(args.name(0)?.to_string())))
//! }
//!
//! let mut registry = CommandRegistry::with_builtins();
//! registry.register(CommandInfo {
//!     name: "forget",
//!     signature: Signature::new(&[ArgumentType::ImageName]),
//!     keywords: &[],
//!     summary: "do nothing with an image",
//!     build,
//! });
//! assert!(registry.get("forget").is_some());
//! ```

use std::collections::BTreeMap;
use std::fmt;

#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::args::{ArgumentWrapper, Keyword, Signature};
use crate::cache::ArtifactCache;
use crate::commands;
use crate::error::{EngineError, EngineResult};

/// A validated, ready-to-run command.
///
/// Built once per invocation and consumed by [`run`](Command::run).
pub trait Command {
    /// Computes the result and stores it in `cache`.
    ///
    /// Implementations must finish all fallible work before the first
    /// write so a failure leaves the cache untouched.
    fn run(self: Box<Self>, cache: &mut ArtifactCache) -> EngineResult<()>;
}

/// Builds a command from validated arguments.
pub type Constructor = fn(&ArgumentWrapper, &ArtifactCache) -> EngineResult<Box<dyn Command>>;

/// Registry entry for one command.
#[derive(Clone, Copy)]
pub struct CommandInfo {
    /// Command name (`brighten`, `blur`, ...).
    pub name: &'static str,
    /// Positional argument types.
    pub signature: Signature,
    /// Keywords the command accepts.
    pub keywords: &'static [Keyword],
    /// One-line description.
    pub summary: &'static str,
    /// Constructor.
    pub build: Constructor,
}

impl fmt::Debug for CommandInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandInfo")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("keywords", &self.keywords)
            .finish_non_exhaustive()
    }
}

impl CommandInfo {
    /// Usage line: name, signature and keywords.
    pub fn usage(&self) -> String {
        let mut line = self.name.to_string();
        if !self.signature.is_empty() {
            line.push(' ');
            line.push_str(&self.signature.to_string());
        }
        for k in self.keywords {
            line.push_str(&format!(" [{}={}]", k.name(), k.value_type()));
        }
        line
    }
}

/// Name → command table.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandInfo>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in command.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for info in commands::builtins() {
            registry.register(info);
        }
        registry
    }

    /// Adds a command, returning the entry it replaced.
    pub fn register(&mut self, info: CommandInfo) -> Option<CommandInfo> {
        let previous = self.commands.insert(info.name, info);
        if previous.is_some() {
            debug!(name = info.name, "replaced command");
        }
        previous
    }

    /// Entry for `name`.
    pub fn get(&self, name: &str) -> Option<&CommandInfo> {
        self.commands.get(name)
    }

    /// Entry for `name`, or [`EngineError::UnknownCommand`].
    pub fn lookup(&self, name: &str) -> EngineResult<&CommandInfo> {
        self.get(name)
            .ok_or_else(|| EngineError::UnknownCommand(name.to_string()))
    }

    /// All entries, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &CommandInfo> {
        self.commands.values()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Signature of every command, by name.
    pub fn signatures(&self) -> BTreeMap<&'static str, Signature> {
        self.commands
            .iter()
            .map(|(name, info)| (*name, info.signature))
            .collect()
    }

    /// Validates, builds and runs `name`.
    pub fn execute(
        &self,
        name: &str,
        args: &ArgumentWrapper,
        cache: &mut ArtifactCache,
    ) -> EngineResult<()> {
        let info = self.lookup(name)?;
        trace!(command = name, args = args.len(), "execute");
        run_command(info, args, cache).map_err(|e| e.in_command(name))
    }
}

fn run_command(
    info: &CommandInfo,
    args: &ArgumentWrapper,
    cache: &mut ArtifactCache,
) -> EngineResult<()> {
    args.validate(&info.signature, info.keywords)?;
    let command = (info.build)(args, cache)?;
    command.run(cache)
}
