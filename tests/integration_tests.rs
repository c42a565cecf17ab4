use bibtex_refman::console::{ScriptedConsole, Session};
use bibtex_refman::prelude::*;
use bibtex_refman::{parse_file, Config, FileStore, ReferenceLoader, ReferenceSink};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn vihavainen() -> Reference {
    Reference::inproceedings()
        .with(FieldName::Author, "Vihavainen, Arto")
        .and_then(|r| {
            r.with(
                FieldName::Title,
                "Extreme Apprenticeship Method in Teaching Programming for Beginners.",
            )
        })
        .and_then(|r| r.with(FieldName::BookTitle, "SIGCSE '11: ..."))
        .and_then(|r| r.with(FieldName::Year, "2011"))
        .unwrap()
}

fn collins() -> Reference {
    Reference::article()
        .with(FieldName::Key, "CBH91")
        .and_then(|r| r.with(FieldName::Author, "Allan Collins; John Seely Brown; Ann Holum"))
        .and_then(|r| r.with(FieldName::Title, "Cognitive apprenticeship: making thinking visible"))
        .and_then(|r| r.with(FieldName::Journal, "American Educator"))
        .and_then(|r| r.with(FieldName::Year, "1991"))
        .and_then(|r| r.with(FieldName::Volume, "6"))
        .and_then(|r| r.with(FieldName::Pages, "38--46"))
        .unwrap()
}

fn doe(author: &str, year: &str) -> Reference {
    Reference::article()
        .with(FieldName::Author, author)
        .and_then(|r| r.with(FieldName::Title, "Sample Title"))
        .and_then(|r| r.with(FieldName::Journal, "Tech Journal"))
        .and_then(|r| r.with(FieldName::Year, year))
        .unwrap()
}

#[test]
fn test_inproceedings_block_is_exact() {
    insta::assert_snapshot!(vihavainen().to_bibtex(), @r"
@inproceedings{Vihavainen2011E,
  author = {Vihavainen, Arto},
  title = {Extreme Apprenticeship Method in Teaching Programming for Beginners.},
  booktitle = {SIGCSE '11: ...},
  year = {2011}
}
");
}

#[test]
fn test_article_with_optional_fields() {
    // year is followed by optional fields here, so it keeps its comma
    insta::assert_snapshot!(collins().to_bibtex(), @r"
@article{CBH91,
  author = {Allan Collins; John Seely Brown; Ann Holum},
  title = {Cognitive apprenticeship: making thinking visible},
  journal = {American Educator},
  year = {1991},
  volume = {6},
  pages = {38--46}
}
");
}

#[test]
fn test_article_without_journal_serializes_empty() {
    let reference = doe("John Doe", "2024").with(FieldName::Journal, "").unwrap();
    assert_eq!(reference.to_bibtex(), "");
    assert!(matches!(
        reference.try_to_bibtex(),
        Err(Error::MissingRequiredField {
            field: FieldName::Journal,
            ..
        })
    ));
}

#[test]
fn test_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("references.bib");
    let mut store = FileStore::new(&path);

    let originals = [
        vihavainen(),
        collins(),
        doe("John Doe", "2024"),
        doe("John Doe, Jane Roe", "2020"),
        doe("Jane Roe", "2021").with(FieldName::Key, "Roe 2021 draft").unwrap(),
    ];
    for reference in &originals {
        store.append(reference).unwrap();
    }

    let loaded = store.load_references();
    assert_eq!(loaded.len(), originals.len());

    for (original, loaded) in originals.iter().zip(&loaded) {
        assert_eq!(loaded.kind(), original.kind());
        assert_eq!(loaded.key(), original.key());
        assert_eq!(loaded.author(), original.author());
        assert_eq!(loaded.title(), original.title());
        assert_eq!(loaded.year(), original.year());
        assert_eq!(loaded.journal(), original.journal());
        assert_eq!(loaded.book_title(), original.book_title());
        assert_eq!(loaded.get(FieldName::Key), original.get(FieldName::Key));
        // every optional field the writer emits is read back
        assert_eq!(loaded.to_bibtex(), original.to_bibtex());
    }

    let bib = parse_file(&path).unwrap();
    assert_eq!(bib.len(), originals.len());
    assert!(bib.find_by_key("CBH91").is_some());
    assert!(bib.find_by_key("John Doe2020S").is_some());
    assert!(bib.find_by_key("Roe 2021 draft").is_some());
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.bib");

    assert!(FileStore::new(&path).load_references().is_empty());
    assert!(matches!(parse_file(&path), Err(Error::IoError(_))));
}

#[test]
fn test_corrupted_record_is_skipped() {
    let input = "@article{bad,
  author = {A},
  title = {T},
  journal = {J},
  year = {abcd}
}

@article{good,
  author = {B},
  title = {U},
  journal = {K},
  year = {2000}
}
";
    let (bib, report) = Bibliography::parse_with_report(input);
    assert_eq!(bib.len(), 1);
    assert_eq!(bib.references()[0].key(), "good");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].key.as_deref(), Some("bad"));
    assert_eq!(report.skipped[0].line, 5);
}

#[test]
fn test_filter_scenarios() {
    let references = vec![
        doe("John Doe, Jane Roe", "2020"),
        doe("Johnny Doe", "2021"),
        doe("Jane Doe", "2022"),
        vihavainen(),
    ];

    // zero criteria keeps everything in order
    let all = Query::new().apply(&references);
    assert_eq!(all.len(), 4);
    assert!(all.iter().zip(&references).all(|(a, b)| std::ptr::eq(*a, b)));

    let exact = Query::new().with(Criterion::Author, "\"John Doe\"");
    let hits = exact.apply(&references);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].author(), "John Doe, Jane Roe");

    let substring = Query::new().with(Criterion::Author, "doe");
    assert_eq!(substring.apply(&references).len(), 3);

    let both = Query::new().with(Criterion::Author, "\"John Doe\", roe");
    assert_eq!(both.apply(&references).len(), 1);

    let journal = Query::new().with(Criterion::Journal, "SIGCSE");
    assert!(journal.apply(&references).is_empty());

    let year = Query::new()
        .with(Criterion::Year, "\"2021\"")
        .with(Criterion::Author, "Doe");
    let hits = year.apply(&references);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].author(), "Johnny Doe");

    let year_prefix = Query::new().with(Criterion::Year, "202");
    assert!(year_prefix.apply(&references).is_empty());
}

#[test]
fn test_session_adds_lists_and_filters() {
    let dir = tempdir().unwrap();
    let config = Config::new(dir.path().join("references.bib"));
    let store = FileStore::from_config(&config);

    let console = ScriptedConsole::new([
        "add",
        "2",
        "Vihavainen, Arto",
        "",
        "Extreme Apprenticeship Method in Teaching Programming for Beginners.",
        "SIGCSE '11: ...",
        "2011",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "y",
        "filter",
        "author",
        "\"Vihavainen\"",
        "exit",
    ]);

    let mut session = Session::new(config.clone(), console, store);
    session.run();

    assert_eq!(session.references().len(), 1);
    let output = session.console().outputs().join("\n");
    assert!(output.contains("Reference added."));
    assert!(output.contains("@inproceedings{Vihavainen2011E,"));

    let content = fs::read_to_string(config.file_path()).unwrap();
    assert_eq!(content, format!("{}\n\n", vihavainen().to_bibtex()));
}
