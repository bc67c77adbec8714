use crate::core::io::pdb::{PdbError, TerInserter};
use crate::engine::config::AnnotateConfig;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnotateSummary {
    pub records: usize,
    pub separators: usize,
}

/// Copies a structure file from `reader` to `writer`, inserting `TER`
/// records between residues.
///
/// Lines are read with [`BufRead::lines`] and every line, including the
/// last one, is written with a single `\n`. CRLF input therefore comes out
/// LF-terminated and an unterminated final line gains a newline.
#[instrument(skip_all, name = "annotate_workflow")]
pub fn annotate_to_writer(
    reader: impl BufRead,
    mut writer: impl Write,
    config: &AnnotateConfig,
) -> Result<AnnotateSummary, PdbError> {
    let mut inserter = TerInserter::new(reader.lines(), config.residues.clone());
    for line in inserter.by_ref() {
        writeln!(writer, "{}", line?)?;
    }
    writer.flush()?;

    let summary = AnnotateSummary {
        records: inserter.records_read(),
        separators: inserter.separators_inserted(),
    };
    info!(
        records = summary.records,
        separators = summary.separators,
        "Structure annotated."
    );
    Ok(summary)
}

/// Annotates the file at `input` into `output`.
///
/// The result is written to a sibling `.partial` file and only renamed onto
/// `output` once the whole input has been annotated. On error `output` is left
/// as it was and the partial file is removed.
pub fn annotate_path(
    input: &Path,
    output: &Path,
    config: &AnnotateConfig,
) -> Result<AnnotateSummary, PdbError> {
    let reader = BufReader::new(File::open(input)?);
    let partial = partial_path(output);

    let writer = BufWriter::new(File::create(&partial)?);
    match annotate_to_writer(reader, writer, config) {
        Ok(summary) => {
            std::fs::rename(&partial, output)?;
            Ok(summary)
        }
        Err(err) => {
            if let Err(cleanup) = std::fs::remove_file(&partial) {
                warn!(path = %partial.display(), error = %cleanup, "Failed to remove partial output.");
            }
            Err(err)
        }
    }
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::{RecordErrorKind, ResidueSelection};
    use std::io::Cursor;
    use tempfile::tempdir;

    const PACKED: &str = "\
REMARK   Generated by packmol
ATOM      1  OH2 WAT A   1       0.000   0.000   0.000
ATOM      2  H1  WAT A   1       0.957   0.000   0.000
ATOM      3  H2  WAT A   1      -0.240   0.927   0.000
ATOM      4  OH2 WAT A   2       3.000   0.000   0.000
ATOM      5  H1  WAT A   2       3.957   0.000   0.000
HETATM    6  C1  TFE B   3       6.000   0.000   0.000
END
";

    #[test]
    fn annotate_to_writer_inserts_separators_between_residues() {
        let mut output = Vec::new();
        let summary =
            annotate_to_writer(Cursor::new(PACKED), &mut output, &AnnotateConfig::default())
                .unwrap();

        assert_eq!(
            summary,
            AnnotateSummary {
                records: 8,
                separators: 2
            }
        );
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[4], "TER");
        assert!(lines[5].starts_with("ATOM      4"));
        assert_eq!(lines[7], "TER");
        assert!(lines[8].starts_with("HETATM    6"));
        assert!(text.ends_with("END\n"));
    }

    #[test]
    fn annotate_to_writer_honors_residue_selection() {
        let config = AnnotateConfig {
            residues: ResidueSelection::named(["TFE"]),
        };
        let mut output = Vec::new();
        let summary = annotate_to_writer(Cursor::new(PACKED), &mut output, &config).unwrap();

        assert_eq!(summary.separators, 0);
        assert_eq!(String::from_utf8(output).unwrap(), PACKED);
    }

    #[test]
    fn annotate_to_writer_fails_on_truncated_atom_record() {
        let input = "ATOM      1  OH2 WAT A   1       0.000   0.000   0.000\nATOM      2  H1\n";
        let mut output = Vec::new();
        let err = annotate_to_writer(Cursor::new(input), &mut output, &AnnotateConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            PdbError::MalformedRecord {
                line: 2,
                kind: RecordErrorKind::LineTooShort { .. }
            }
        ));
    }

    #[test]
    fn annotate_path_round_trips_through_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("packed.pdb");
        let output = dir.path().join("blended.pdb");
        std::fs::write(&input, PACKED).unwrap();

        let summary = annotate_path(&input, &output, &AnnotateConfig::default()).unwrap();
        assert_eq!(summary.separators, 2);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().filter(|l| *l == "TER").count(), 2);
        assert_eq!(written.lines().count(), PACKED.lines().count() + 2);
    }

    #[test]
    fn annotate_path_leaves_existing_output_untouched_on_malformed_record() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("packed.pdb");
        let output = dir.path().join("out.pdb");
        std::fs::write(
            &input,
            "ATOM      1  OH2 WAT A   1       0.000   0.000   0.000\n\
             ATOM      2  OH2 WAT A   2       3.000   0.000   0.000\n\
             ATOM  3\n",
        )
        .unwrap();
        std::fs::write(&output, "previous contents\n").unwrap();

        let err = annotate_path(&input, &output, &AnnotateConfig::default()).unwrap_err();
        assert!(matches!(err, PdbError::MalformedRecord { line: 3, .. }));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous contents\n");
        assert!(!partial_path(&output).exists());
    }

    #[test]
    fn annotate_path_creates_no_output_on_malformed_record() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("packed.pdb");
        let output = dir.path().join("out.pdb");
        std::fs::write(&input, "ATOM      1  OH2 WAT A   1       0.000\nATOM  2\n").unwrap();

        assert!(annotate_path(&input, &output, &AnnotateConfig::default()).is_err());
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn partial_path_is_a_sibling_of_the_output() {
        let partial = partial_path(Path::new("/tmp/run/blended.pdb"));
        assert_eq!(partial, Path::new("/tmp/run/blended.pdb.partial"));
    }

    #[test]
    fn annotate_to_writer_normalizes_line_terminators() {
        let input = "REMARK crlf\r\nATOM      1  OH2 WAT A   1       0.000\r\nEND";
        let mut output = Vec::new();
        annotate_to_writer(Cursor::new(input), &mut output, &AnnotateConfig::default()).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "REMARK crlf\nATOM      1  OH2 WAT A   1       0.000\nEND\n"
        );
    }

    #[test]
    fn annotate_path_reports_missing_input() {
        let dir = tempdir().unwrap();
        let err = annotate_path(
            &dir.path().join("missing.pdb"),
            &dir.path().join("out.pdb"),
            &AnnotateConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PdbError::Io(_)));
    }
}
