//! Call-site information: caller paths, build identity and stack traces

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Source location of a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Location of the nearest caller not marked `#[track_caller]`
    #[track_caller]
    pub fn here() -> Self {
        Self::from(Location::caller())
    }

    /// The file's parent directory and name: `core/logger.rs:42`
    pub fn short(&self) -> String {
        format!("{}:{}", short_path(&self.file), self.line)
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

fn short_path(file: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    let Some(last) = file.rfind(is_sep) else {
        return file;
    };
    match file[..last].rfind(is_sep) {
        Some(prev) => &file[prev + 1..],
        None => file,
    }
}

/// Identity of the application build, used to shorten caller paths
///
/// Use [`build_identity!`](crate::build_identity) to capture the calling
/// crate's manifest directory and version at compile time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildIdentity {
    module_root: Option<String>,
    version_qualifier: Option<String>,
}

impl BuildIdentity {
    pub fn new(module_root: impl Into<String>) -> Self {
        Self {
            module_root: Some(module_root.into()),
            version_qualifier: None,
        }
    }

    /// An identity that leaves caller paths untouched
    pub fn unknown() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_version_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        let qualifier = qualifier.into();
        self.version_qualifier = (!qualifier.is_empty()).then_some(qualifier);
        self
    }

    pub fn module_root(&self) -> Option<&str> {
        self.module_root.as_deref()
    }

    /// Strip the module root prefix, then the first version qualifier
    pub fn trim_path<'a>(&self, file: &'a str) -> std::borrow::Cow<'a, str> {
        let trimmed = match self.module_root.as_deref() {
            Some(root) if !root.is_empty() => file.strip_prefix(root).unwrap_or(file),
            _ => file,
        };
        match self.version_qualifier.as_deref() {
            Some(qualifier) if trimmed.contains(qualifier) => {
                std::borrow::Cow::Owned(trimmed.replacen(qualifier, "", 1))
            }
            _ => std::borrow::Cow::Borrowed(trimmed),
        }
    }
}

/// Capture the current module root and `-<version>` qualifier of the calling crate
#[macro_export]
macro_rules! build_identity {
    () => {
        $crate::BuildIdentity::new(concat!(env!("CARGO_MANIFEST_DIR"), "/"))
            .with_version_qualifier(concat!("-", env!("CARGO_PKG_VERSION")))
    };
}

const INTERNAL_FRAMES: &[&str] = &[
    "std::backtrace",
    "field_logger::core::caller",
    "field_logger::core::pipeline",
    "field_logger::core::logger",
    "field_logger::core::structured_builder",
    "field_logger::core::std_writer",
    "<field_logger::",
];

/// Capture the current stack, dropping the logger's own frames and `skip` more
pub fn capture_stack(skip: usize) -> String {
    trim_stack(&Backtrace::force_capture().to_string(), skip)
}

/// Source location of the first frame of a trimmed stack
///
/// `None` when the frame carries no `at file:line:column` line, as in
/// builds without debug info.
pub(crate) fn frame_location(stack: &str) -> Option<Caller> {
    let mut lines = stack.lines();
    lines.next()?;
    let at = lines.next()?.trim_start().strip_prefix("at ")?;
    let (rest, _column) = at.rsplit_once(':')?;
    let (file, line) = rest.rsplit_once(':')?;
    let line = line.parse().ok()?;
    let file = file.strip_prefix("./").unwrap_or(file);
    Some(Caller::new(file.to_string(), line))
}

/// Drop leading internal frames and then `skip` caller frames from a rendered backtrace
pub(crate) fn trim_stack(rendered: &str, skip: usize) -> String {
    let mut frames: Vec<Vec<&str>> = Vec::new();
    for line in rendered.lines() {
        if is_frame_header(line) || frames.is_empty() {
            frames.push(vec![line]);
        } else if let Some(frame) = frames.last_mut() {
            frame.push(line);
        }
    }

    let internal = frames
        .iter()
        .take_while(|frame| frame.first().is_some_and(|header| is_internal(header)))
        .count();

    frames
        .iter()
        .skip(internal + skip)
        .flatten()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_frame_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && trimmed[digits..].starts_with(": ")
}

fn is_internal(header: &str) -> bool {
    let symbol = header
        .trim_start()
        .split_once(": ")
        .map(|(_, symbol)| symbol)
        .unwrap_or_default();
    INTERNAL_FRAMES.iter().any(|p| symbol.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_caller() {
        assert_eq!(
            Caller::new("src/core/logger.rs", 42).short(),
            "core/logger.rs:42"
        );
        assert_eq!(Caller::new("main.rs", 7).short(), "main.rs:7");
        assert_eq!(Caller::new("src/main.rs", 7).short(), "src/main.rs:7");
        assert_eq!(
            Caller::new(r"C:\app\src\lib.rs", 1).short(),
            r"src\lib.rs:1"
        );
    }

    #[test]
    fn test_here_tracks_this_file() {
        let caller = Caller::here();
        assert!(caller.file.ends_with("caller.rs"));
        assert!(caller.line > 0);
    }

    #[test]
    fn test_trim_path() {
        let identity = BuildIdentity::new("/home/dev/app/").with_version_qualifier("-0.3.1");
        assert_eq!(
            identity.trim_path("/home/dev/app/src/main.rs"),
            "src/main.rs"
        );
        assert_eq!(
            identity.trim_path("/registry/app-0.3.1/src/lib.rs"),
            "/registry/app/src/lib.rs"
        );
        assert_eq!(identity.trim_path("src/other.rs"), "src/other.rs");

        assert_eq!(BuildIdentity::unknown().trim_path("/abs/x.rs"), "/abs/x.rs");
    }

    #[test]
    fn test_build_identity_macro() {
        let identity = crate::build_identity!();
        let root = identity.module_root().expect("manifest dir captured");
        assert!(root.ends_with('/'));
        let inside = format!("{}src/lib.rs", root);
        assert_eq!(identity.trim_path(&inside), "src/lib.rs");
    }

    #[test]
    fn test_trim_stack() {
        let rendered = "\
   0: std::backtrace::Backtrace::force_capture
             at /rustc/library/std/src/backtrace.rs:312:9
   1: field_logger::core::pipeline::Pipeline::emit
             at ./src/core/pipeline.rs:80:5
   2: app::wrapper
             at ./src/main.rs:10:5
   3: app::main
             at ./src/main.rs:20:5";

        let trimmed = trim_stack(rendered, 0);
        assert!(trimmed.starts_with("   2: app::wrapper"));
        assert!(trimmed.contains("app::main"));

        let skipped = trim_stack(rendered, 1);
        assert!(skipped.starts_with("   3: app::main"));
        assert!(!skipped.contains("wrapper"));
    }

    #[test]
    fn test_frame_location() {
        let stack = "\
   2: app::wrapper
             at ./src/main.rs:10:5
   3: app::main
             at /home/dev/app/src/main.rs:20:5";
        assert_eq!(frame_location(stack), Some(Caller::new("src/main.rs", 10)));

        let outer = trim_stack(stack, 1);
        assert_eq!(
            frame_location(&outer),
            Some(Caller::new("/home/dev/app/src/main.rs", 20))
        );

        let stripped = "   2: app::wrapper\n   3: app::main";
        assert_eq!(frame_location(stripped), None);
        assert_eq!(frame_location(""), None);
    }

    #[test]
    fn test_internal_frames() {
        assert!(is_internal(
            "   1: field_logger::core::logger::Logger::info"
        ));
        assert!(is_internal(
            "   1: field_logger::core::logger::tests::helper"
        ));
        assert!(is_internal(
            "   4: <field_logger::core::std_writer::StdWriter as std::io::Write>::write"
        ));
        assert!(!is_internal("   2: app::wrapper"));
        assert!(!is_internal("   2: field_logger_demo::main"));
    }

    #[test]
    fn test_capture_stack_is_not_empty() {
        let stack = capture_stack(0);
        assert!(!stack.is_empty());
        assert!(!stack.contains("std::backtrace::Backtrace::force_capture"));
    }
}
