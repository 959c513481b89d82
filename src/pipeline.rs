use std::path::Path;

use crate::parser::{meta::Spans, ParseError, ParseOutput, Parser};

/// A filename with its contents
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

impl SourceFile {
    /// Create a source file from a string
    ///
    /// A line terminator is appended if `contents` does not end with one, so
    /// that a file missing its final newline does not lose its last line.
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        let mut contents = contents.into();
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        Self {
            name: name.into(),
            contents,
        }
    }

    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_string_lossy(), contents))
    }
}

#[derive(Debug)]
enum ConfigError {
    Read(String, std::io::Error),
    /// The file as a whole could not be parsed
    Fatal(ParseError),
    /// A single line was skipped
    Line(ParseError),
}

/// Errors for a set of files, rendered with their source when displayed
#[derive(Debug)]
pub struct Report {
    files: Vec<SourceFile>,
    errors: Vec<ConfigError>,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write(f, true)
    }
}

impl Report {
    /// Render all errors, with or without ANSI colors
    pub fn write(
        &self,
        f: &mut impl std::fmt::Write,
        color: bool,
    ) -> std::fmt::Result {
        use ariadne::{Color, Config, Label, Report, ReportKind};

        let mut file_cache = ariadne::sources(
            self.files
                .iter()
                .map(|s| (s.name.clone(), s.contents.clone())),
        );

        for error in &self.errors {
            let (error, kind, label_color) = match error {
                ConfigError::Read(name, io) => {
                    writeln!(f, "could not open `{name}`: {io}")?;
                    continue;
                }
                ConfigError::Fatal(error) => {
                    (error, ReportKind::Error, Color::Red)
                }
                ConfigError::Line(error) => {
                    (error, ReportKind::Warning, Color::Yellow)
                }
            };

            let file = self.filename(error.location.file);
            let span = error.location.start..error.location.end;

            let label = Label::new((file.clone(), span.clone()))
                .with_message(error.kind.label())
                .with_color(label_color);

            let mut report = Report::build(kind, (file, span))
                .with_config(Config::default().with_color(color))
                .with_message(format!("Parse error: {error}"))
                .with_label(label);

            if let Some(note) = &error.note {
                report = report.with_note(note);
            }

            let mut v = Vec::new();
            report
                .finish()
                .write(&mut file_cache, &mut v)
                .map_err(|_| std::fmt::Error)?;
            let s = String::from_utf8_lossy(&v);
            write!(f, "{s}")?;
        }

        Ok(())
    }

    fn filename(&self, i: usize) -> String {
        self.files
            .get(i)
            .map_or_else(|| format!("<file {i}>"), |f| f.name.clone())
    }

    /// Number of lines that failed to parse
    pub fn skipped_lines(&self) -> usize {
        self.errors
            .iter()
            .filter(|e| matches!(e, ConfigError::Line(_)))
            .count()
    }

    /// Whether any file could not be read or parsed at all
    pub fn has_fatal_errors(&self) -> bool {
        self.errors.iter().any(|e| !matches!(e, ConfigError::Line(_)))
    }
}

impl std::error::Error for Report {}

/// Parsed configurations of a set of files
///
/// `outputs[i]` belongs to `files[i]`. All spans live in one arena and carry
/// the index of their file.
#[derive(Debug)]
pub struct Parsed {
    pub files: Vec<SourceFile>,
    pub spans: Spans,
    pub outputs: Vec<ParseOutput>,
}

impl Parsed {
    /// Report of all recovered line errors, if there are any
    pub fn report(&self) -> Option<Report> {
        let errors: Vec<_> = self
            .outputs
            .iter()
            .flat_map(|o| o.diagnostics.iter().cloned())
            .map(ConfigError::Line)
            .collect();

        if errors.is_empty() {
            None
        } else {
            Some(Report {
                files: self.files.clone(),
                errors,
            })
        }
    }
}

pub fn run(
    files: impl IntoIterator<Item = String>,
) -> Result<Parsed, Report> {
    let files = read_files(files)?;
    parse_files(files)
}

pub fn test_file(source: &str) -> Vec<SourceFile> {
    vec![SourceFile::new("test", source)]
}

pub fn read_files(
    files: impl IntoIterator<Item = String>,
) -> Result<Vec<SourceFile>, Report> {
    let results: Vec<_> = files
        .into_iter()
        .map(|f| {
            let result = SourceFile::read(&f);
            (f, result)
        })
        .collect();

    let mut files = Vec::new();
    let mut errors = Vec::new();
    for (name, result) in results {
        match result {
            Ok(file) => files.push(file),
            Err(err) => {
                errors.push(ConfigError::Read(name.clone(), err));
                files.push(SourceFile::new(name, ""));
            }
        };
    }

    if errors.is_empty() {
        Ok(files)
    } else {
        Err(Report { files, errors })
    }
}

/// Parse every file
///
/// Fails only if some file could not be parsed at all. Files with skipped
/// lines are returned as usual, see [`Parsed::report`].
pub fn parse_files(files: Vec<SourceFile>) -> Result<Parsed, Report> {
    let mut spans = Spans::default();
    let mut outputs = Vec::new();
    let mut errors = Vec::new();

    for (i, file) in files.iter().enumerate() {
        match Parser::parse(i, &mut spans, &file.contents) {
            Ok(output) => {
                log::info!(
                    "parsed `{}`: {} lines, {} skipped",
                    file.name,
                    output.configuration.lines.len(),
                    output.diagnostics.len(),
                );
                outputs.push(output);
            }
            Err(err) => {
                log::info!("could not parse `{}`: {err}", file.name);
                errors.push(ConfigError::Fatal(*err));
            }
        }
    }

    if errors.is_empty() {
        Ok(Parsed {
            files,
            spans,
            outputs,
        })
    } else {
        Err(Report { files, errors })
    }
}
