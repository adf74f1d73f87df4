//! Open-mode strings such as `r`, `w+b` or `a+`.
//!
//! A mode string is a primary character followed by optional modifiers.
//! The primary character decides the base access, `+` adds the
//! complementary capability, `b`/`t` select translation and `e` asks for
//! close-on-exec. Neither of the last two has any bearing on what a stream
//! can do.

use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ModeError {
    #[error("mode string is empty")]
    Empty,
    #[error("unknown primary mode `{0}`")]
    UnknownPrimary(char),
    #[error("unknown mode modifier `{0}`")]
    UnknownModifier(char),
}

impl ModeError {
    pub fn as_io_error(&self) -> std::io::Error {
        use std::io::{Error, ErrorKind};
        Error::new(ErrorKind::InvalidInput, self.clone())
    }
}

impl From<ModeError> for std::io::Error {
    fn from(err: ModeError) -> Self {
        err.as_io_error()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PrimaryMode {
    /// `r`: read from the start.
    Read,
    /// `w`: write, truncating.
    Write,
    /// `a`: write, appending.
    Append,
    /// `x`: write, failing if the target exists.
    Exclusive,
    /// `c`: write, creating without truncating.
    Create,
}

impl PrimaryMode {
    fn from_char(c: char) -> Option<PrimaryMode> {
        let primary = match c {
            'r' => PrimaryMode::Read,
            'w' => PrimaryMode::Write,
            'a' => PrimaryMode::Append,
            'x' => PrimaryMode::Exclusive,
            'c' => PrimaryMode::Create,
            _ => return None,
        };

        Some(primary)
    }

    pub const fn as_char(self) -> char {
        match self {
            PrimaryMode::Read => 'r',
            PrimaryMode::Write => 'w',
            PrimaryMode::Append => 'a',
            PrimaryMode::Exclusive => 'x',
            PrimaryMode::Create => 'c',
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Translation {
    Binary,
    Text,
}

impl Translation {
    pub const fn as_char(self) -> char {
        match self {
            Translation::Binary => 'b',
            Translation::Text => 't',
        }
    }
}

/// A parsed mode string.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Mode {
    primary: PrimaryMode,
    plus: bool,
    translation: Option<Translation>,
    close_on_exec: bool,
}

impl Mode {
    pub const fn new(primary: PrimaryMode, plus: bool) -> Mode {
        Mode {
            primary,
            plus,
            translation: None,
            close_on_exec: false,
        }
    }

    pub const fn with_translation(self, translation: Translation) -> Mode {
        Mode {
            translation: Some(translation),
            ..self
        }
    }

    #[inline(always)]
    pub fn primary(&self) -> PrimaryMode {
        self.primary
    }

    #[inline(always)]
    pub fn has_plus(&self) -> bool {
        self.plus
    }

    #[inline(always)]
    pub fn translation(&self) -> Option<Translation> {
        self.translation
    }

    #[inline(always)]
    pub fn close_on_exec(&self) -> bool {
        self.close_on_exec
    }

    pub fn is_appendable(&self) -> bool {
        self.primary == PrimaryMode::Append
    }

    pub fn is_append_only(&self) -> bool {
        self.is_appendable() && !self.plus
    }

    pub fn is_readable(&self) -> bool {
        self.primary == PrimaryMode::Read || self.plus
    }

    pub fn is_read_only(&self) -> bool {
        self.primary == PrimaryMode::Read && !self.plus
    }

    pub fn is_writable(&self) -> bool {
        !self.is_read_only()
    }

    pub fn is_write_only(&self) -> bool {
        self.is_writable() && !self.is_readable()
    }

    /// Builds the `OpenOptions` that open a file with this mode.
    pub fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();

        match self.primary {
            PrimaryMode::Read => options.read(true),
            PrimaryMode::Write => options.write(true).create(true).truncate(true),
            PrimaryMode::Append => options.append(true).create(true),
            PrimaryMode::Exclusive => options.write(true).create_new(true),
            PrimaryMode::Create => options.write(true).create(true),
        };

        if self.plus {
            options.read(true).write(true);
        }

        options
    }
}

impl FromStr for Mode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let first = chars.next().ok_or(ModeError::Empty)?;
        let primary = PrimaryMode::from_char(first).ok_or(ModeError::UnknownPrimary(first))?;

        let mut mode = Mode::new(primary, false);

        // `+` may follow the translation flag, as in `rb+`.
        for c in chars {
            match c {
                '+' => mode.plus = true,
                'b' => mode.translation = Some(Translation::Binary),
                't' => mode.translation = Some(Translation::Text),
                'e' => mode.close_on_exec = true,
                other => return Err(ModeError::UnknownModifier(other)),
            }
        }

        Ok(mode)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary.as_char())?;

        if self.plus {
            write!(f, "+")?;
        }

        if let Some(translation) = self.translation {
            write!(f, "{}", translation.as_char())?;
        }

        if self.close_on_exec {
            write!(f, "e")?;
        }

        Ok(())
    }
}

#[inline(always)]
pub fn mode_is_appendable(mode: &str) -> Result<bool, ModeError> {
    Ok(mode.parse::<Mode>()?.is_appendable())
}

#[inline(always)]
pub fn mode_is_append_only(mode: &str) -> Result<bool, ModeError> {
    Ok(mode.parse::<Mode>()?.is_append_only())
}

#[inline(always)]
pub fn mode_is_readable(mode: &str) -> Result<bool, ModeError> {
    Ok(mode.parse::<Mode>()?.is_readable())
}

#[inline(always)]
pub fn mode_is_read_only(mode: &str) -> Result<bool, ModeError> {
    Ok(mode.parse::<Mode>()?.is_read_only())
}

#[inline(always)]
pub fn mode_is_writable(mode: &str) -> Result<bool, ModeError> {
    Ok(mode.parse::<Mode>()?.is_writable())
}

#[inline(always)]
pub fn mode_is_write_only(mode: &str) -> Result<bool, ModeError> {
    Ok(mode.parse::<Mode>()?.is_write_only())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    const VALID: &[&str] = &[
        "r", "rb", "rt", "r+", "rb+", "r+b", "w", "wb", "w+", "w+b", "wb+", "a", "ab", "a+",
        "ab+", "x", "x+", "xb", "c", "c+", "ct+",
    ];

    #[test]
    fn append_plus() {
        assert!(mode_is_appendable("a+").unwrap());
        assert!(!mode_is_append_only("a+").unwrap());
        assert!(mode_is_readable("a+").unwrap());
        assert!(mode_is_writable("a+").unwrap());
        assert!(!mode_is_write_only("a+").unwrap());
    }

    #[test]
    fn write_binary() {
        assert!(!mode_is_read_only("wb").unwrap());
        assert!(mode_is_writable("wb").unwrap());
        assert!(!mode_is_readable("wb").unwrap());
        assert!(mode_is_write_only("wb").unwrap());
    }

    #[test]
    fn plus_after_translation() {
        let mode: Mode = "rb+".parse().unwrap();
        assert!(mode.has_plus());
        assert_eq!(mode.translation(), Some(Translation::Binary));
        assert!(mode.is_readable());
        assert!(mode.is_writable());
        assert!(!mode.is_read_only());
    }

    #[test]
    fn read_without_plus_is_read_only() {
        for m in VALID.iter().filter(|m| m.starts_with('r') && !m.contains('+')) {
            assert!(mode_is_read_only(m).unwrap(), "{}", m);
            assert!(!mode_is_writable(m).unwrap(), "{}", m);
        }
    }

    #[test]
    fn plus_is_read_write() {
        for m in VALID.iter().filter(|m| m.contains('+')) {
            assert!(mode_is_readable(m).unwrap(), "{}", m);
            assert!(mode_is_writable(m).unwrap(), "{}", m);
        }
    }

    #[test]
    fn append_only_iff_no_plus() {
        for m in VALID.iter().filter(|m| m.starts_with('a')) {
            assert!(mode_is_appendable(m).unwrap(), "{}", m);
            assert_eq!(mode_is_append_only(m).unwrap(), !m.contains('+'), "{}", m);
        }
    }

    #[test]
    fn write_only_law() {
        for m in VALID {
            let mode: Mode = m.parse().unwrap();
            assert_eq!(
                mode.is_write_only(),
                mode.is_writable() && !mode.is_readable(),
                "{}",
                m
            );
            assert!(!(mode.is_append_only() && mode.is_read_only()), "{}", m);
        }
    }

    #[test]
    fn invalid_modes() {
        assert_eq!("".parse::<Mode>(), Err(ModeError::Empty));
        assert_eq!("q".parse::<Mode>(), Err(ModeError::UnknownPrimary('q')));
        assert_eq!("+r".parse::<Mode>(), Err(ModeError::UnknownPrimary('+')));
        assert_eq!("rz".parse::<Mode>(), Err(ModeError::UnknownModifier('z')));
        assert_eq!("re+x".parse::<Mode>(), Err(ModeError::UnknownModifier('x')));
        assert!(mode_is_readable("").is_err());

        let err: std::io::Error = ModeError::Empty.into();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn close_on_exec_is_capability_neutral() {
        let mode: Mode = "rbe".parse().unwrap();
        assert!(mode.close_on_exec());
        assert!(mode.is_read_only());
        assert_eq!(mode.translation(), Some(Translation::Binary));
        assert_eq!(mode.to_string(), "rbe");

        assert!(mode_is_write_only("we").unwrap());
        assert!(mode_is_readable("ae+").unwrap());
        assert!(!mode_is_append_only("ae+").unwrap());
        assert!(!"r".parse::<Mode>().unwrap().close_on_exec());
    }

    #[test]
    fn display() {
        assert_eq!("rb+".parse::<Mode>().unwrap().to_string(), "r+b");
        assert_eq!("a".parse::<Mode>().unwrap().to_string(), "a");
        assert_eq!(
            Mode::new(PrimaryMode::Write, true)
                .with_translation(Translation::Binary)
                .to_string(),
            "w+b"
        );
    }

    #[test]
    fn open_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mode.txt");

        let mut file = "x".parse::<Mode>().unwrap().open_options().open(&path).unwrap();
        file.write_all(b"hello").unwrap();
        drop(file);

        assert!("x".parse::<Mode>().unwrap().open_options().open(&path).is_err());

        let mut file = "a".parse::<Mode>().unwrap().open_options().open(&path).unwrap();
        file.write_all(b" world").unwrap();
        drop(file);

        let mut file = "r".parse::<Mode>().unwrap().open_options().open(&path).unwrap();
        let mut s = String::new();
        file.read_to_string(&mut s).unwrap();
        assert_eq!(s, "hello world");
        assert!(file.write_all(b"nope").is_err());

        "w".parse::<Mode>().unwrap().open_options().open(&path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

        assert!("r"
            .parse::<Mode>()
            .unwrap()
            .open_options()
            .open(dir.path().join("missing"))
            .is_err());
    }
}
