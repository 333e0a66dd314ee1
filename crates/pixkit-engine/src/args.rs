//! Typed command arguments and signature validation.
//!
//! A [`Signature`] lists the positional [`ArgumentType`]s a command takes.
//! An [`ArgumentWrapper`] carries the positional [`ArgumentValue`]s of one
//! invocation plus optional [`Keyword`] arguments.
//!
//! # Validation order
//!
//! 1. Positional count must equal the signature length.
//! 2. Each positional value must have its slot's type.
//! 3. Keywords are checked against the keyword table and the command's
//!    accepted set, independent of position.
//!
//! # Text form
//!
//! [`ArgumentWrapper::from_tokens`] builds arguments from whitespace-split
//! tokens. `key=value` tokens are keywords, everything else is positional:
//!
//! ```rust
//! use pixkit_engine::args::{ArgumentType, ArgumentWrapper, Signature};
//!
//! const SIG: Signature = Signature::new(&[
//!     ArgumentType::Integer,
//!     ArgumentType::ImageName,
//!     ArgumentType::NewImageName,
//! ]);
//! let args = ArgumentWrapper::from_tokens(&["20", "in", "out", "split=50"], &SIG).unwrap();
//! assert_eq!(args.integer(0).unwrap(), 20);
//! assert_eq!(args.split().unwrap().map(|s| s.percent()), Some(50));
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use pixkit_ops::Split;
use smallvec::SmallVec;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::error::{EngineError, EngineResult};

/// Type tag of one argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentType {
    /// Signed integer.
    Integer,
    /// Name of an existing cache artifact.
    ImageName,
    /// Name the command writes its result under.
    NewImageName,
    /// Path of a file to read.
    FileIn,
    /// Path of a file to write.
    FileOut,
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgumentType::Integer => "Integer",
            ArgumentType::ImageName => "ImageName",
            ArgumentType::NewImageName => "NewImageName",
            ArgumentType::FileIn => "FileIn",
            ArgumentType::FileOut => "FileOut",
        })
    }
}

/// One typed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// Integer value.
    Integer(i64),
    /// Existing artifact name.
    ImageName(String),
    /// Output artifact name.
    NewImageName(String),
    /// Input path.
    FileIn(PathBuf),
    /// Output path.
    FileOut(PathBuf),
}

impl ArgumentValue {
    /// Type tag of this value.
    pub fn kind(&self) -> ArgumentType {
        match self {
            ArgumentValue::Integer(_) => ArgumentType::Integer,
            ArgumentValue::ImageName(_) => ArgumentType::ImageName,
            ArgumentValue::NewImageName(_) => ArgumentType::NewImageName,
            ArgumentValue::FileIn(_) => ArgumentType::FileIn,
            ArgumentValue::FileOut(_) => ArgumentType::FileOut,
        }
    }

    /// Parses `text` as a value of type `ty`.
    ///
    /// `argument` names the slot in error messages.
    pub fn parse(ty: ArgumentType, text: &str, argument: &str) -> EngineResult<Self> {
        Ok(match ty {
            ArgumentType::Integer => {
                let v = text.parse::<i64>().map_err(|_| EngineError::MalformedNumericArgument {
                    argument: argument.to_string(),
                    text: text.to_string(),
                })?;
                ArgumentValue::Integer(v)
            }
            ArgumentType::ImageName => ArgumentValue::ImageName(text.to_string()),
            ArgumentType::NewImageName => ArgumentValue::NewImageName(text.to_string()),
            ArgumentType::FileIn => ArgumentValue::FileIn(PathBuf::from(text)),
            ArgumentType::FileOut => ArgumentValue::FileOut(PathBuf::from(text)),
        })
    }

    fn name(&self) -> Option<&str> {
        match self {
            ArgumentValue::ImageName(s) | ArgumentValue::NewImageName(s) => Some(s),
            _ => None,
        }
    }
}

/// Checks an artifact name: non-empty, no whitespace.
pub fn check_name(name: &str) -> EngineResult<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn mismatch(slot: usize, expected: ArgumentType, found: &ArgumentValue) -> EngineError {
    EngineError::ArgumentTypeMismatch {
        slot,
        expected,
        found: found.kind(),
    }
}

/// Ordered positional argument types of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(&'static [ArgumentType]);

impl Signature {
    /// Wraps a static type list.
    pub const fn new(types: &'static [ArgumentType]) -> Self {
        Self(types)
    }

    /// Slot types in order.
    pub fn types(&self) -> &'static [ArgumentType] {
        self.0
    }

    /// Number of positional slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for commands without positional arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", ty)?;
        }
        Ok(())
    }
}

/// Named optional arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// Split-preview percentage.
    Split,
    /// Mask image name.
    MaskImage,
}

impl Keyword {
    /// Every keyword.
    pub const ALL: [Keyword; 2] = [Keyword::Split, Keyword::MaskImage];

    /// Text form used in `key=value` tokens.
    pub fn name(self) -> &'static str {
        match self {
            Keyword::Split => "split",
            Keyword::MaskImage => "maskimg",
        }
    }

    /// Value type the keyword carries.
    pub fn value_type(self) -> ArgumentType {
        match self {
            Keyword::Split => ArgumentType::Integer,
            Keyword::MaskImage => ArgumentType::ImageName,
        }
    }

    /// Looks a keyword up by its text form.
    pub fn from_name(name: &str) -> EngineResult<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| EngineError::UnknownKeyword(name.to_string()))
    }

    fn check(self, value: &ArgumentValue) -> EngineResult<()> {
        if value.kind() != self.value_type() {
            return Err(EngineError::InvalidParameterRange(format!(
                "{} expects {}, got {}",
                self.name(),
                self.value_type(),
                value.kind()
            )));
        }
        match (self, value) {
            (Keyword::Split, ArgumentValue::Integer(v)) => {
                Split::new(*v)?;
            }
            (Keyword::MaskImage, ArgumentValue::ImageName(name)) => check_name(name)?,
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Positional and keyword arguments of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentWrapper {
    positional: SmallVec<[ArgumentValue; 5]>,
    keywords: SmallVec<[(Keyword, ArgumentValue); 2]>,
}

impl ArgumentWrapper {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn push(&mut self, value: ArgumentValue) -> &mut Self {
        self.positional.push(value);
        self
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, value: ArgumentValue) -> Self {
        self.positional.push(value);
        self
    }

    /// Builder form of [`set_keyword`](Self::set_keyword).
    pub fn with_keyword(mut self, keyword: Keyword, value: ArgumentValue) -> Self {
        self.set_keyword(keyword, value);
        self
    }

    /// Sets a keyword, replacing an earlier value.
    pub fn set_keyword(&mut self, keyword: Keyword, value: ArgumentValue) {
        match self.keywords.iter_mut().find(|(k, _)| *k == keyword) {
            Some(slot) => slot.1 = value,
            None => self.keywords.push((keyword, value)),
        }
    }

    /// Positional arguments in order.
    pub fn positional(&self) -> &[ArgumentValue] {
        &self.positional
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// True when there are no positional arguments.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Keyword value, if given.
    pub fn keyword(&self, keyword: Keyword) -> Option<&ArgumentValue> {
        self.keywords.iter().find(|(k, _)| *k == keyword).map(|(_, v)| v)
    }

    /// Keywords that were given.
    pub fn keywords(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.keywords.iter().map(|(k, _)| *k)
    }

    fn get(&self, index: usize) -> EngineResult<&ArgumentValue> {
        self.positional
            .get(index)
            .ok_or_else(|| EngineError::ArgumentCountMismatch {
                expected: index + 1,
                found: self.positional.len(),
            })
    }

    /// Integer at `index`.
    pub fn integer(&self, index: usize) -> EngineResult<i64> {
        match self.get(index)? {
            ArgumentValue::Integer(v) => Ok(*v),
            other => Err(mismatch(index, ArgumentType::Integer, other)),
        }
    }

    /// Artifact name at `index` (either [`ArgumentType::ImageName`] or
    /// [`ArgumentType::NewImageName`]).
    pub fn name(&self, index: usize) -> EngineResult<&str> {
        let value = self.get(index)?;
        value
            .name()
            .ok_or_else(|| mismatch(index, ArgumentType::ImageName, value))
    }

    /// Path at `index` (either [`ArgumentType::FileIn`] or
    /// [`ArgumentType::FileOut`]).
    pub fn path(&self, index: usize) -> EngineResult<&Path> {
        match self.get(index)? {
            ArgumentValue::FileIn(p) | ArgumentValue::FileOut(p) => Ok(p),
            other => Err(mismatch(index, ArgumentType::FileIn, other)),
        }
    }

    /// The `split` keyword as a validated percentage.
    pub fn split(&self) -> EngineResult<Option<Split>> {
        match self.keyword(Keyword::Split) {
            Some(ArgumentValue::Integer(v)) => Ok(Some(Split::new(*v)?)),
            Some(other) => Err(EngineError::InvalidParameterRange(format!(
                "split expects Integer, got {}",
                other.kind()
            ))),
            None => Ok(None),
        }
    }

    /// The `maskimg` keyword.
    pub fn mask(&self) -> Option<&str> {
        self.keyword(Keyword::MaskImage).and_then(ArgumentValue::name)
    }

    /// Checks positional arguments against `signature` and keywords
    /// against `accepted`.
    pub fn validate(&self, signature: &Signature, accepted: &[Keyword]) -> EngineResult<()> {
        if self.positional.len() != signature.len() {
            return Err(EngineError::ArgumentCountMismatch {
                expected: signature.len(),
                found: self.positional.len(),
            });
        }
        for (slot, (value, &expected)) in self.positional.iter().zip(signature.types()).enumerate() {
            if value.kind() != expected {
                return Err(mismatch(slot, expected, value));
            }
            if let Some(name) = value.name() {
                check_name(name)?;
            }
        }
        for (keyword, value) in &self.keywords {
            if !accepted.contains(keyword) {
                return Err(EngineError::UnknownKeyword(keyword.name().to_string()));
            }
            keyword.check(value)?;
        }
        Ok(())
    }

    /// Parses text tokens against `signature`.
    ///
    /// Keyword tokens (`key=value`) may appear anywhere. Fails on the count
    /// before looking at any positional token.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], signature: &Signature) -> EngineResult<Self> {
        let mut positional: SmallVec<[&str; 5]> = SmallVec::new();
        let mut args = ArgumentWrapper::new();
        for token in tokens.iter().map(AsRef::as_ref) {
            match token.split_once('=') {
                Some((key, value)) => {
                    let keyword = Keyword::from_name(key)?;
                    let value = ArgumentValue::parse(keyword.value_type(), value, keyword.name())?;
                    args.set_keyword(keyword, value);
                }
                None => positional.push(token),
            }
        }

        if positional.len() != signature.len() {
            return Err(EngineError::ArgumentCountMismatch {
                expected: signature.len(),
                found: positional.len(),
            });
        }
        for (slot, (text, &ty)) in positional.iter().zip(signature.types()).enumerate() {
            let value = ArgumentValue::parse(ty, text, &format!("argument {}", slot))?;
            args.push(value);
        }
        trace!(positional = args.len(), keywords = args.keywords.len(), "parsed arguments");
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRIGHTEN: Signature = Signature::new(&[
        ArgumentType::Integer,
        ArgumentType::ImageName,
        ArgumentType::NewImageName,
    ]);
    const ALL: &[Keyword] = &Keyword::ALL;

    fn brighten_args() -> ArgumentWrapper {
        ArgumentWrapper::new()
            .with(ArgumentValue::Integer(10))
            .with(ArgumentValue::ImageName("in".into()))
            .with(ArgumentValue::NewImageName("out".into()))
    }

    #[test]
    fn test_valid() {
        let args = brighten_args();
        args.validate(&BRIGHTEN, ALL).unwrap();
        assert_eq!(args.integer(0).unwrap(), 10);
        assert_eq!(args.name(1).unwrap(), "in");
        assert_eq!(args.name(2).unwrap(), "out");
    }

    #[test]
    fn test_count_checked_first() {
        // Wrong types everywhere, but the count error wins.
        let args = ArgumentWrapper::new()
            .with(ArgumentValue::FileIn("a".into()))
            .with(ArgumentValue::FileIn("b".into()));
        assert_eq!(
            args.validate(&BRIGHTEN, ALL),
            Err(EngineError::ArgumentCountMismatch { expected: 3, found: 2 })
        );
    }

    #[test]
    fn test_type_mismatch_names_slot() {
        let args = ArgumentWrapper::new()
            .with(ArgumentValue::Integer(10))
            .with(ArgumentValue::NewImageName("in".into()))
            .with(ArgumentValue::NewImageName("out".into()));
        assert_eq!(
            args.validate(&BRIGHTEN, ALL),
            Err(EngineError::ArgumentTypeMismatch {
                slot: 1,
                expected: ArgumentType::ImageName,
                found: ArgumentType::NewImageName,
            })
        );
    }

    #[test]
    fn test_keywords() {
        let args = brighten_args().with_keyword(Keyword::Split, ArgumentValue::Integer(101));
        assert!(matches!(
            args.validate(&BRIGHTEN, ALL),
            Err(EngineError::InvalidParameterRange(_))
        ));

        let args = brighten_args().with_keyword(Keyword::Split, ArgumentValue::Integer(40));
        args.validate(&BRIGHTEN, ALL).unwrap();
        assert_eq!(args.split().unwrap().unwrap().percent(), 40);
        assert_eq!(
            args.validate(&BRIGHTEN, &[]),
            Err(EngineError::UnknownKeyword("split".into()))
        );
    }

    #[test]
    fn test_invalid_name() {
        let args = ArgumentWrapper::new()
            .with(ArgumentValue::Integer(1))
            .with(ArgumentValue::ImageName("".into()))
            .with(ArgumentValue::NewImageName("out".into()));
        assert!(matches!(args.validate(&BRIGHTEN, ALL), Err(EngineError::InvalidName(_))));
        assert!(check_name("a b").is_err());
        assert!(check_name("a_b").is_ok());
    }

    #[test]
    fn test_from_tokens() {
        let args =
            ArgumentWrapper::from_tokens(&["maskimg=m", "-5", "in", "out", "split=0"], &BRIGHTEN)
                .unwrap();
        assert_eq!(args.integer(0).unwrap(), -5);
        assert_eq!(args.mask(), Some("m"));
        assert_eq!(args.split().unwrap(), Some(Split::new(0).unwrap()));
        args.validate(&BRIGHTEN, ALL).unwrap();
    }

    #[test]
    fn test_from_tokens_errors() {
        assert!(matches!(
            ArgumentWrapper::from_tokens(&["x", "in", "out"], &BRIGHTEN),
            Err(EngineError::MalformedNumericArgument { .. })
        ));
        assert!(matches!(
            ArgumentWrapper::from_tokens(&["x", "in"], &BRIGHTEN),
            Err(EngineError::ArgumentCountMismatch { expected: 3, found: 2 })
        ));
        assert!(matches!(
            ArgumentWrapper::from_tokens(&["1", "in", "out", "zoom=2"], &BRIGHTEN),
            Err(EngineError::UnknownKeyword(_))
        ));
        assert!(matches!(
            ArgumentWrapper::from_tokens(&["1", "in", "out", "split=half"], &BRIGHTEN),
            Err(EngineError::MalformedNumericArgument { .. })
        ));
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(BRIGHTEN.to_string(), "Integer ImageName NewImageName");
    }
}
