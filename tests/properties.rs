use inifile::{Document, Error, IniFile, ParseError, Section};

#[test]
fn round_trip_keeps_section_and_key_order() {
    let text = "top=1\n[Beta]\nz=26\na=1\n[Alpha]\nm=13\n[Beta]\nb=2\n";

    let document = Document::parse(text).expect("failed to parse hardcoded INI text");
    let reparsed = Document::parse(&document.to_string()).expect("expected round trip");

    assert_eq!(document.to_string(), text);
    assert_eq!(document.len(), reparsed.len());
    for (left, right) in document.iter().zip(&reparsed) {
        assert_eq!(left.name(), right.name());
        assert!(left.iter().eq(right.iter()));
    }
}

#[test]
fn malformed_line_aborts_parse() {
    assert_eq!(
        Document::parse("[A]\nfoo\n"),
        Err(ParseError::Syntax {
            line: 2,
            content: "foo".to_owned()
        })
    );
}

#[test]
fn preamble_section_has_no_name() {
    let document = Document::parse("x=1\n[A]\ny=2\n").expect("failed to parse hardcoded INI text");

    let preamble = document.preamble().expect("expected preamble section");
    assert_eq!(preamble.get("x"), Some("1"));
    assert_eq!(document.get(0), Some(preamble));
    assert_eq!(document.section("a").and_then(|s| s.get("y")), Some("2"));
}

#[test]
fn shared_file_supports_the_collection_surface() {
    let file = IniFile::new();

    file.add_entry("Dup", "n", "1");
    file.push(Section::new("dup"));
    assert_eq!(file.section("DUP").map(|s| s.len()), Some(1));

    let mut replacement = Section::new("Dup");
    replacement.insert("n", "2");
    assert_eq!(file.replace("dup", &replacement), 2);
    assert_eq!(file.snapshot().to_string(), "[Dup]\nn=2\n[Dup]\nn=2\n");

    assert!(matches!(
        file.remove_at(2),
        Err(Error::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn typed_getters_fall_back_to_defaults() {
    let document =
        Document::parse("[Limits]\nmax = not-a-number\nmin = 3\n").expect("failed to parse");
    let limits = document.section("limits").expect("expected section to exist");

    assert_eq!(limits.get_i32("max", 10), 10);
    assert_eq!(limits.get_i32("min", 0), 3);
    assert!((limits.get_f64("ratio", 0.5) - 0.5).abs() < f64::EPSILON);
}
