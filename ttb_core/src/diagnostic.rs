use crate::netlist::ir::SourceLoc;
use annotate_snippets::renderer::{AnsiColor, Color, Style};
use annotate_snippets::{Level, Renderer, Snippet};
use std::fmt::{Display, Formatter};

/// A fatal error, the first one aborts the run.
///
/// Construct through [Diagnostic::new] and friends, the builder then turns into this value with
/// [DiagnosticBuilder::finish].
#[must_use]
#[derive(Debug)]
pub struct DiagError(Box<Diagnostic>);

pub type DiagResult<T = ()> = Result<T, DiagError>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum DiagKind {
    #[strum(serialize = "unsupported")]
    Unsupported,
    #[strum(serialize = "internal error")]
    Internal,
    #[strum(serialize = "invalid input")]
    Input,
}

#[derive(Debug)]
pub struct Diagnostic {
    pub kind: DiagKind,
    pub title: String,
    pub location: Option<SourceLoc>,
    pub footers: Vec<(Level, String)>,
}

#[must_use]
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

#[derive(Debug, Copy, Clone)]
pub struct DiagnosticStringSettings {
    pub colors: bool,
    /// Show the source line of the location, if the file can be read.
    pub source_line: bool,
}

impl Default for DiagnosticStringSettings {
    fn default() -> Self {
        DiagnosticStringSettings {
            colors: true,
            source_line: true,
        }
    }
}

impl Diagnostic {
    pub fn new(kind: DiagKind, title: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder {
            diagnostic: Diagnostic {
                kind,
                title: title.into(),
                location: None,
                footers: vec![],
            },
        }
    }

    /// Utility constructor for constructs this tool does not know how to traverse.
    pub fn new_unsupported(construct: impl Display) -> DiagnosticBuilder {
        Diagnostic::new(DiagKind::Unsupported, format!("{construct} is not supported"))
    }

    /// Utility constructor for broken internal invariants.
    #[track_caller]
    pub fn new_internal(title: impl Into<String>) -> DiagnosticBuilder {
        let caller = std::panic::Location::caller();
        Diagnostic::new(DiagKind::Internal, title).footer(Level::Info, format!("raised at {caller}"))
    }

    pub fn new_input(title: impl Into<String>) -> DiagnosticBuilder {
        Diagnostic::new(DiagKind::Input, title)
    }

    pub fn to_string(&self, settings: DiagnosticStringSettings) -> String {
        let Self {
            kind,
            title,
            location,
            footers,
        } = self;

        // these need to outlive the message
        let title = format!("{kind}: {title}");
        let origin = location.as_ref().map(|loc| loc.file.display().to_string());
        let line = match location {
            Some(loc) if settings.source_line => ttb_util::io::read_line(&loc.file, loc.line as usize),
            _ => None,
        };
        let fallback = match (location, &line) {
            (Some(loc), None) => Some(format!("at {loc}")),
            _ => None,
        };

        let mut message = Level::Error.title(&title);

        if let (Some(loc), Some(origin), Some(line)) = (location, &origin, &line) {
            let mut snippet = Snippet::source(line).origin(origin).line_start(loc.line as usize);

            // underline the line without its indentation
            let start = line.len() - line.trim_start().len();
            let end = line.trim_end().len();
            if start < end {
                snippet = snippet.annotation(Level::Error.span(start..end).label("originates here"));
            }
            message = message.snippet(snippet);
        }
        if let Some(fallback) = &fallback {
            message = message.footer(Level::Note.title(fallback));
        }
        for (level, footer) in footers {
            message = message.footer(level.title(footer));
        }

        let renderer = if settings.colors {
            Renderer::styled().emphasis(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::BrightRed))))
        } else {
            Renderer::plain()
        };
        let string = renderer.render(message).to_string();
        string
    }
}

impl DiagnosticBuilder {
    pub fn location(mut self, location: Option<SourceLoc>) -> Self {
        self.diagnostic.location = location;
        self
    }

    pub fn footer(mut self, level: Level, footer: impl Into<String>) -> Self {
        self.diagnostic.footers.push((level, footer.into()));
        self
    }

    pub fn note(self, footer: impl Into<String>) -> Self {
        self.footer(Level::Note, footer)
    }

    pub fn finish(self) -> DiagError {
        DiagError(Box::new(self.diagnostic))
    }
}

impl DiagError {
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.0
    }

    pub fn kind(&self) -> DiagKind {
        self.0.kind
    }

    pub fn title(&self) -> &str {
        &self.0.title
    }

    /// Attach `location` unless a more specific one is already present.
    pub fn or_location(mut self, location: Option<&SourceLoc>) -> Self {
        if self.0.location.is_none() {
            self.0.location = location.cloned();
        }
        self
    }
}

impl Display for DiagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Diagnostic {
            kind,
            title,
            location,
            footers,
        } = &*self.0;
        write!(f, "{kind}: {title}")?;
        if let Some(location) = location {
            write!(f, " (at {location})")?;
        }
        for (_, footer) in footers {
            write!(f, "\n  {footer}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DiagError {}

#[cfg(test)]
mod test {
    use crate::diagnostic::{DiagKind, Diagnostic, DiagnosticStringSettings};
    use crate::netlist::ir::SourceLoc;

    const PLAIN: DiagnosticStringSettings = DiagnosticStringSettings {
        colors: false,
        source_line: true,
    };

    #[test]
    fn unsupported_title() {
        let err = Diagnostic::new_unsupported("LPM device type `abs`").finish();
        assert_eq!(err.kind(), DiagKind::Unsupported);
        assert_eq!(err.to_string(), "unsupported: LPM device type `abs` is not supported");
    }

    #[test]
    fn location_is_kept_when_present() {
        let first = SourceLoc {
            file: "a.v".into(),
            line: 3,
        };
        let second = SourceLoc {
            file: "b.v".into(),
            line: 8,
        };
        let err = Diagnostic::new_input("bad")
            .location(Some(first.clone()))
            .finish()
            .or_location(Some(&second));
        assert_eq!(err.diagnostic().location, Some(first));
    }

    #[test]
    fn render_missing_file_falls_back_to_note() {
        let err = Diagnostic::new_unsupported("statement type `while`")
            .location(Some(SourceLoc {
                file: "does/not/exist.v".into(),
                line: 12,
            }))
            .finish();
        let rendered = err.diagnostic().to_string(PLAIN);
        assert!(rendered.contains("unsupported: statement type `while` is not supported"));
        assert!(rendered.contains("at does/not/exist.v:12"));
    }

    #[test]
    fn render_source_line() {
        let path = std::env::temp_dir().join(format!("ttb_render_source_line_{}.v", std::process::id()));
        std::fs::write(&path, "module top;\n    always @(posedge clk) q <= d;\nendmodule\n").unwrap();

        let err = Diagnostic::new_unsupported("statement type `while`")
            .location(Some(SourceLoc {
                file: path.clone(),
                line: 2,
            }))
            .note("while tracking `top.q`")
            .finish();
        let rendered = err.diagnostic().to_string(PLAIN);
        std::fs::remove_file(&path).unwrap();

        assert!(rendered.contains("unsupported: statement type `while` is not supported"), "{rendered}");
        assert!(rendered.contains("always @(posedge clk) q <= d;"), "{rendered}");
        assert!(rendered.contains("originates here"), "{rendered}");
        assert!(rendered.contains("while tracking `top.q`"), "{rendered}");
        assert!(!rendered.contains("at /"), "{rendered}");
    }
}
