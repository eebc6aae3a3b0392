//! Library-level tests for the partitioning engine against fixture documents.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use textpart::partition::{
    partition_text, BoundaryRule, BrokenParagraphGrouper, Classification, PartitionOptions,
    Sources,
};
use textpart::{Element, ElementKind, TextpartError};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/text")
        .join(name)
}

fn kinds_and_texts(elements: &[Element]) -> Vec<(ElementKind, &str)> {
    elements.iter().map(|e| (e.kind, e.text.as_str())).collect()
}

fn expected_fake_text() -> Vec<(ElementKind, &'static str)> {
    vec![
        (
            ElementKind::NarrativeText,
            "This is a test document to use for unit tests.",
        ),
        (ElementKind::Address, "Doylestown, PA 18901"),
        (ElementKind::Title, "Important points:"),
        (ElementKind::ListItem, "Hamburgers are delicious"),
        (ElementKind::ListItem, "Dogs are the best"),
        (ElementKind::ListItem, "I love fuzzy blankets"),
    ]
}

const SHORT_PARAGRAPHS: &str = "This is a story.\n\nThis is a story that doesn't matter because it is just being used as an example.\n\nHi.\n\nHello.\n\nHowdy.\n\nHola.\n\nThe example is simple and repetitive and long and somewhat boring, but it serves a purpose.\n\nEnd.";

// ─── 1. Scenarios ───────────────────────────────────────────────

#[test]
fn scenario_mixed_document() {
    let text = "This is a test document to use for unit tests.\n\nDoylestown, PA 18901\n\nImportant points:\n- Hamburgers are delicious\n- Dogs are the best\n- I love fuzzy blankets";
    let elements = partition_text(Sources::text(text), &PartitionOptions::default()).unwrap();
    assert_eq!(kinds_and_texts(&elements), expected_fake_text());
}

#[test]
fn scenario_empty_text() {
    let elements = partition_text(Sources::text(""), &PartitionOptions::default()).unwrap();
    assert!(elements.is_empty());
    let elements = partition_text(Sources::text("  \n\n\t "), &PartitionOptions::default()).unwrap();
    assert!(elements.is_empty());
}

#[test]
fn scenario_page_break_dropped() {
    let elements = partition_text(
        Sources::text("--------------------"),
        &PartitionOptions::default(),
    )
    .unwrap();
    assert!(elements.is_empty());
}

#[test]
fn page_break_between_content_is_dropped() {
    let text = "First section ends here.\n\n---\n\nSecond section starts here.";
    let elements = partition_text(Sources::text(text), &PartitionOptions::default()).unwrap();
    let texts: Vec<&str> = elements.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["First section ends here.", "Second section starts here."]
    );
}

#[test]
fn scenario_broken_paragraphs_grouped() {
    let options = PartitionOptions::default().with_grouper(BrokenParagraphGrouper);
    let elements = partition_text(Sources::filename(&fixture("broken-paragraphs.txt")), &options)
        .unwrap();
    assert_eq!(
        kinds_and_texts(&elements),
        vec![
            (
                ElementKind::NarrativeText,
                "The big brown fox was walking down the lane."
            ),
            (
                ElementKind::NarrativeText,
                "At the end of the lane, the fox met a bear."
            ),
        ]
    );
}

#[test]
fn scenario_max_partition_splits_on_words() {
    let text = "This is a story. This is a story that doesn't matter because it is just being used as an example. Hi. Hello. Howdy. Hola. The example is simple and repetitive and long and somewhat boring, but it serves a purpose. End.";
    let options = PartitionOptions::default().with_bounds(7, 75);
    let elements = partition_text(Sources::text(text), &options).unwrap();

    assert!(elements.len() > 1);
    for element in &elements {
        assert!(element.char_len() <= 75, "{:?} too long", element.text);
    }
    let words: Vec<&str> = elements
        .iter()
        .flat_map(|e| e.text.split_whitespace())
        .collect();
    assert_eq!(words, text.split_whitespace().collect::<Vec<_>>());
}

#[test]
fn scenario_min_partition_combines() {
    let options = PartitionOptions::default().with_bounds(6, 1500);
    let elements = partition_text(Sources::text(SHORT_PARAGRAPHS), &options).unwrap();
    let texts: Vec<&str> = elements.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "This is a story.",
            "This is a story that doesn't matter because it is just being used as an example.",
            "Hi. Hello.",
            "Howdy.",
            "Hola. The example is simple and repetitive and long and somewhat boring, but it serves a purpose. End.",
        ]
    );
}

#[test]
fn min_and_max_together() {
    let options = PartitionOptions::default().with_bounds(7, 20);
    let elements = partition_text(Sources::text(SHORT_PARAGRAPHS), &options).unwrap();
    let texts: Vec<&str> = elements.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts[6], "Hi. Hello.");
    assert_eq!(texts[7], "Howdy. Hola.");
    assert_eq!(texts.last().copied(), Some("purpose. End."));
    assert!(elements.iter().all(|e| e.char_len() <= 20));
}

#[test]
fn memo_heading_and_address() {
    let elements = partition_text(
        Sources::filename(&fixture("memo.txt")),
        &PartitionOptions::default(),
    )
    .unwrap();
    assert_eq!(
        kinds_and_texts(&elements),
        vec![
            (ElementKind::Title, "VERY IMPORTANT MEMO"),
            (ElementKind::Address, "DOYLESTOWN, PA 18901"),
        ]
    );
}

#[test]
fn blank_line_boundaries_keep_lines_together() {
    let text = "Important points:\n- Hamburgers are delicious\n\nDoylestown, PA 18901";
    let options = PartitionOptions::default().with_boundary(BoundaryRule::BlankLine);
    let elements = partition_text(Sources::text(text), &options).unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].text, "Important points:\n- Hamburgers are delicious");
    assert_eq!(elements[1].kind, ElementKind::Address);
}

// ─── 2. Sources and encodings ───────────────────────────────────

#[test]
fn filename_source_matches_text_source() {
    for encoding in [None, Some("utf-8")] {
        let path = fixture("fake-text.txt");
        let mut sources = Sources::filename(&path);
        sources.encoding = encoding;
        let elements = partition_text(sources, &PartitionOptions::default()).unwrap();
        assert_eq!(kinds_and_texts(&elements), expected_fake_text());
    }
}

#[test]
fn file_reader_source() {
    let mut file = fs::File::open(fixture("fake-text.txt")).unwrap();
    let elements =
        partition_text(Sources::file(&mut file), &PartitionOptions::default()).unwrap();
    assert_eq!(kinds_and_texts(&elements), expected_fake_text());
    assert!(elements[0].metadata.filename.is_none());
}

#[test]
fn detects_bom_encodings() {
    for name in ["fake-text-utf-16.txt", "fake-text-utf-32.txt"] {
        let elements = partition_text(
            Sources::filename(&fixture(name)),
            &PartitionOptions::default(),
        )
        .unwrap();
        assert_eq!(kinds_and_texts(&elements), expected_fake_text(), "{name}");
    }
}

#[test]
fn detects_utf16_without_bom() {
    for name in ["fake-text-utf-16-le.txt", "fake-text-utf-16-be.txt"] {
        let path = fixture(name);
        let elements = partition_text(Sources::filename(&path), &PartitionOptions::default())
            .unwrap();
        assert!(elements.iter().all(|e| !e.text.contains('\0')), "{name}");
        assert_eq!(kinds_and_texts(&elements), expected_fake_text(), "{name}");
    }
}

#[test]
fn explicit_encodings() {
    for (name, encoding) in [
        ("fake-text-utf-16-be.txt", "utf-16-be"),
        ("fake-text-utf-16.txt", "utf-16"),
        ("fake-text-utf-32.txt", "utf-32"),
    ] {
        let path = fixture(name);
        let sources = Sources::filename(&path).with_encoding(encoding);
        let elements = partition_text(sources, &PartitionOptions::default()).unwrap();
        assert_eq!(kinds_and_texts(&elements), expected_fake_text(), "{name}");
    }
}

#[test]
fn legacy_encoding_is_guessed() {
    let elements = partition_text(
        Sources::filename(&fixture("fake-text-cp1252.txt")),
        &PartitionOptions::default(),
    )
    .unwrap();
    assert_eq!(
        kinds_and_texts(&elements),
        vec![
            (ElementKind::Title, "Café menu"),
            (
                ElementKind::NarrativeText,
                "The café serves crème brûlée every day."
            ),
        ]
    );
}

#[test]
fn wrong_explicit_encoding_is_decode_error() {
    let path = fixture("fake-text-cp1252.txt");
    let sources = Sources::filename(&path).with_encoding("utf-8");
    let err = partition_text(sources, &PartitionOptions::default()).unwrap_err();
    assert!(matches!(err, TextpartError::Decode { .. }), "{err}");
}

#[test]
fn unknown_encoding_is_config_error() {
    let path = fixture("fake-text.txt");
    let sources = Sources::filename(&path).with_encoding("no-such-codec");
    assert!(partition_text(sources, &PartitionOptions::default())
        .unwrap_err()
        .is_config());
}

#[test]
fn zero_or_many_sources_rejected() {
    let options = PartitionOptions::default();
    assert!(partition_text(Sources::default(), &options)
        .unwrap_err()
        .is_config());

    let path = fixture("fake-text.txt");
    let sources = Sources {
        text: Some("hello"),
        filename: Some(&path),
        ..Sources::default()
    };
    assert!(partition_text(sources, &options).unwrap_err().is_config());
}

// ─── 3. Metadata ────────────────────────────────────────────────

#[test]
fn filename_metadata_is_split() {
    let path = fixture("fake-text.txt");
    let elements = partition_text(Sources::filename(&path), &PartitionOptions::default()).unwrap();
    let metadata = &elements[0].metadata;
    assert_eq!(metadata.filename.as_deref(), Some("fake-text.txt"));
    assert_eq!(
        metadata.file_directory.as_deref(),
        path.parent().and_then(Path::to_str)
    );
    assert!(metadata.date.is_some());
}

#[test]
fn metadata_filename_override() {
    let options = PartitionOptions::default().with_metadata_filename("test");
    let elements = partition_text(Sources::filename(&fixture("fake-text.txt")), &options).unwrap();
    assert!(elements
        .iter()
        .all(|e| e.metadata.filename.as_deref() == Some("test")));
}

#[test]
fn include_path_in_filename() {
    let path = fixture("fake-text.txt");
    let options = PartitionOptions::default().with_path_in_filename();
    let elements = partition_text(Sources::filename(&path), &options).unwrap();
    assert_eq!(
        elements[0].metadata.filename.as_deref(),
        path.to_str()
    );
    assert!(elements[0].metadata.file_directory.is_none());

    let options = options.with_metadata_filename("TEST");
    let elements = partition_text(Sources::filename(&path), &options).unwrap();
    let expected = path.parent().unwrap().join("TEST");
    assert_eq!(elements[0].metadata.filename.as_deref(), expected.to_str());
}

#[test]
fn text_source_with_filename_override() {
    let options = PartitionOptions::default().with_metadata_filename("docs/notes.txt");
    let elements = partition_text(Sources::text("Hello there, world."), &options).unwrap();
    assert_eq!(elements[0].metadata.filename.as_deref(), Some("notes.txt"));
    assert_eq!(elements[0].metadata.file_directory.as_deref(), Some("docs"));
    assert!(elements[0].metadata.date.is_none());
}

#[test]
fn metadata_date_override() {
    let date = NaiveDate::from_ymd_opt(2020, 7, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let options = PartitionOptions::default().with_metadata_date(date);
    let elements = partition_text(Sources::filename(&fixture("fake-text.txt")), &options).unwrap();
    assert!(elements.iter().all(|e| e.metadata.date == Some(date)));
}

#[test]
fn metadata_suppressed() {
    let options = PartitionOptions::default()
        .without_metadata()
        .with_regex("zip", r"\d{5}");
    let elements = partition_text(Sources::filename(&fixture("fake-text.txt")), &options).unwrap();
    assert!(!elements.is_empty());
    assert!(elements.iter().all(|e| e.metadata.is_empty()));
}

#[test]
fn regex_metadata_spans() {
    let options = PartitionOptions::default().with_regex("zip", r"\d{5}");
    let elements = partition_text(Sources::filename(&fixture("fake-text.txt")), &options).unwrap();
    let address = elements
        .iter()
        .find(|e| e.kind == ElementKind::Address)
        .unwrap();
    let matches = &address.metadata.regex_metadata.as_ref().unwrap()["zip"];
    assert_eq!(matches.len(), 1);
    assert_eq!(
        (matches[0].text.as_str(), matches[0].start, matches[0].end),
        ("18901", 15, 20)
    );
    let title = elements.iter().find(|e| e.kind == ElementKind::Title).unwrap();
    assert!(title.metadata.regex_metadata.is_none());
}

#[test]
fn invalid_regex_is_config_error() {
    let options = PartitionOptions::default().with_regex("bad", "[unclosed");
    assert!(partition_text(Sources::text("anything"), &options)
        .unwrap_err()
        .is_config());
}

// ─── 4. Output shape ────────────────────────────────────────────

#[test]
fn element_ids_are_stable_content_hashes() {
    let a = partition_text(Sources::text("Dogs are the best."), &PartitionOptions::default())
        .unwrap();
    let b = partition_text(Sources::text("Dogs are the best."), &PartitionOptions::default())
        .unwrap();
    assert_eq!(a[0].element_id, b[0].element_id);
    assert_eq!(a[0].element_id.len(), 32);
    assert!(a[0].element_id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn serialized_shape() {
    let date = NaiveDate::from_ymd_opt(2023, 4, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    let options = PartitionOptions::default()
        .with_metadata_filename("memo.txt")
        .with_metadata_date(date);
    let elements = partition_text(Sources::text("Important points:"), &options).unwrap();
    let value = serde_json::to_value(&elements[0]).unwrap();
    assert_eq!(value["type"], "Title");
    assert_eq!(value["text"], "Important points:");
    assert_eq!(value["metadata"]["filename"], "memo.txt");
    assert_eq!(value["metadata"]["date"], "2023-04-01T08:30:00");
    assert!(value["metadata"].get("file_directory").is_none());
    assert!(value["element_id"].is_string());
}

#[test]
fn custom_classifier_can_drop_segments() {
    let options = PartitionOptions::default().with_classifier(|text: &str| {
        if text.starts_with("Hi") {
            Classification::PageBreak
        } else {
            Classification::Element(ElementKind::UncategorizedText)
        }
    });
    let elements =
        partition_text(Sources::text("Hi there friend\nBye now friend"), &options).unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Bye now friend");
}
