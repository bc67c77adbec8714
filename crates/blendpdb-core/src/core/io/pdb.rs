use phf::{Set, phf_set};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::io;
use thiserror::Error;
use tracing::trace;

static ATOM_RECORD_TYPES: Set<&'static str> = phf_set! {
    "ATOM", "HETATM",
};

/// Record written between two residues.
pub const SEPARATOR_RECORD: &str = "TER";

/// Narrowest line that still carries every column read from an atom record.
pub const MIN_ATOM_RECORD_WIDTH: usize = 26;

const RESIDUE_NAME_COLUMNS: (usize, usize) = (17, 20);
const RESIDUE_INDEX_COLUMNS: (usize, usize) = (23, 26);

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed record on line {line}: {kind}")]
    MalformedRecord { line: usize, kind: RecordErrorKind },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordErrorKind {
    #[error(
        "{record_type} record is {length} characters wide (must be at least {min})",
        min = MIN_ATOM_RECORD_WIDTH
    )]
    LineTooShort {
        record_type: &'static str,
        length: usize,
    },
    #[error("Columns {columns} do not fall on character boundaries")]
    InvalidColumns { columns: String },
}

impl From<Infallible> for PdbError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Residues whose boundaries are marked with separator records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResidueSelection {
    #[default]
    All,
    Named(BTreeSet<String>),
}

impl ResidueSelection {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Named(
            names
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .collect(),
        )
    }

    pub fn matches(&self, residue_name: &str) -> bool {
        match self {
            ResidueSelection::All => true,
            ResidueSelection::Named(names) => names.contains(residue_name.trim()),
        }
    }
}

/// The columns of an `ATOM`/`HETATM` line that residue tracking depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomRecord<'a> {
    pub record_type: &'static str,
    pub residue_name: &'a str,
    pub residue_index: &'a str,
}

fn record_type(line: &str) -> Option<&'static str> {
    [6, 4]
        .into_iter()
        .filter_map(|width| line.get(..width))
        .find_map(|code| ATOM_RECORD_TYPES.get_key(code).copied())
}

fn columns(line: &str, (start, end): (usize, usize)) -> Result<&str, RecordErrorKind> {
    line.get(start..end)
        .ok_or_else(|| RecordErrorKind::InvalidColumns {
            columns: format!("{}-{}", start + 1, end),
        })
}

/// Classifies a structure line.
///
/// Returns `Ok(None)` for records other than `ATOM`/`HETATM`. Atom records
/// narrower than [`MIN_ATOM_RECORD_WIDTH`] are rejected instead of being read
/// with truncated columns.
pub fn parse_atom_record(line: &str) -> Result<Option<AtomRecord<'_>>, RecordErrorKind> {
    let Some(record_type) = record_type(line) else {
        return Ok(None);
    };
    if line.len() < MIN_ATOM_RECORD_WIDTH {
        return Err(RecordErrorKind::LineTooShort {
            record_type,
            length: line.len(),
        });
    }
    Ok(Some(AtomRecord {
        record_type,
        residue_name: columns(line, RESIDUE_NAME_COLUMNS)?,
        residue_index: columns(line, RESIDUE_INDEX_COLUMNS)?,
    }))
}

/// Iterator adapter that inserts a [`SEPARATOR_RECORD`] wherever the residue
/// index changes between two selected atom records.
///
/// Every input line is yielded unchanged and in order. The adapter reads its
/// source exactly once; after the first error it yields nothing further.
pub struct TerInserter<I> {
    lines: I,
    selection: ResidueSelection,
    previous_residue_index: Option<String>,
    pending: Option<String>,
    records: usize,
    separators: usize,
    finished: bool,
}

impl<I> TerInserter<I> {
    pub fn new(lines: I, selection: ResidueSelection) -> Self {
        Self {
            lines,
            selection,
            previous_residue_index: None,
            pending: None,
            records: 0,
            separators: 0,
            finished: false,
        }
    }

    /// Input lines consumed so far.
    pub fn records_read(&self) -> usize {
        self.records
    }

    pub fn separators_inserted(&self) -> usize {
        self.separators
    }

    /// Updates the residue state and reports whether a separator is due
    /// before `line`.
    fn observe(&mut self, line: &str) -> Result<bool, RecordErrorKind> {
        let Some(record) = parse_atom_record(line)? else {
            return Ok(false);
        };
        if !self.selection.matches(record.residue_name) {
            return Ok(false);
        }
        let boundary = match self.previous_residue_index.as_deref() {
            Some(previous) if previous == record.residue_index => return Ok(false),
            Some(_) => true,
            None => false,
        };
        self.previous_residue_index = Some(record.residue_index.to_string());
        Ok(boundary)
    }
}

impl<I, E> Iterator for TerInserter<I>
where
    I: Iterator<Item = Result<String, E>>,
    E: Into<PdbError>,
{
    type Item = Result<String, PdbError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.take() {
            return Some(Ok(line));
        }
        if self.finished {
            return None;
        }

        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => {
                self.finished = true;
                return Some(Err(e.into()));
            }
        };
        self.records += 1;

        match self.observe(&line) {
            Ok(true) => {
                trace!(line = self.records, "Residue boundary, inserting separator.");
                self.separators += 1;
                self.pending = Some(line);
                Some(Ok(SEPARATOR_RECORD.to_string()))
            }
            Ok(false) => Some(Ok(line)),
            Err(kind) => {
                self.finished = true;
                Some(Err(PdbError::MalformedRecord {
                    line: self.records,
                    kind,
                }))
            }
        }
    }
}

/// Wraps an infallible line source in a [`TerInserter`].
pub fn insert_ter<I, S>(
    lines: I,
    selection: ResidueSelection,
) -> TerInserter<impl Iterator<Item = Result<String, Infallible>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TerInserter::new(lines.into_iter().map(|line| Ok(line.into())), selection)
}
