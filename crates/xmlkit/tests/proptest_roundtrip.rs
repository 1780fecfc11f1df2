/*
 * proptest_roundtrip.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Values written through the typed setters read back unchanged, both from
 * the in-memory tree and after a serialize/parse cycle.
 */

use proptest::prelude::*;
use xmlkit::{Document, ErrorKind, FromXmlText, ParseOptions, ToXmlText, kind};

fn through_attribute<T: FromXmlText + ToXmlText>(value: T) -> (T, T) {
    let mut doc = Document::parse("<v/>").unwrap();
    let v = doc.root_element().unwrap();
    v.set_attribute(&mut doc, "x", value).unwrap();
    let in_memory = v.attribute::<T>(&doc, "x").unwrap();

    let reparsed = Document::parse(&doc.to_xml_string().unwrap()).unwrap();
    let v = reparsed.root_element().unwrap();
    (in_memory, v.attribute::<T>(&reparsed, "x").unwrap())
}

/// Reparses `doc` keeping whitespace-only text, which is content here.
fn reparse(doc: &Document) -> Document {
    let options = ParseOptions::default().keep_blank_text(true);
    Document::parse_with_options(&doc.to_xml_string().unwrap(), &options).unwrap()
}

fn through_text<T: FromXmlText + ToXmlText>(value: T) -> T {
    let mut doc = Document::parse("<v/>").unwrap();
    let v = doc.root_element().unwrap();
    v.set_text(&mut doc, value).unwrap();
    let reparsed = reparse(&doc);
    reparsed.root_element().unwrap().text::<T>(&reparsed).unwrap()
}

fn through_cdata(content: &str) -> String {
    let mut doc = Document::parse("<v/>").unwrap();
    let v = doc.root_element().unwrap();
    let cdata = doc.create_cdata(content);
    v.append_child(&mut doc, cdata).unwrap();
    let reparsed = reparse(&doc);
    reparsed.root_element().unwrap().text::<String>(&reparsed).unwrap()
}

proptest! {
    #[test]
    fn integers_roundtrip(value in any::<i64>(), small in any::<u8>()) {
        prop_assert_eq!(through_attribute(value), (value, value));
        prop_assert_eq!(through_attribute(small), (small, small));
        prop_assert_eq!(through_text(value), value);
    }

    #[test]
    fn floats_roundtrip_exactly(value in any::<f64>().prop_filter("NaN", |v| !v.is_nan())) {
        prop_assert_eq!(through_attribute(value), (value, value));
        prop_assert_eq!(through_text(value), value);
    }

    #[test]
    fn bools_roundtrip(value in any::<bool>()) {
        prop_assert_eq!(through_attribute(value), (value, value));
        prop_assert_eq!(through_text(value), value);
    }

    #[test]
    fn strings_roundtrip(value in r#"[a-zA-Z0-9<>&"' =/\]\-é]{0,24}"#) {
        prop_assert_eq!(through_attribute(value.clone()), (value.clone(), value));
    }

    // Empty text writes `<v></v>`, which reads back as no text at all.
    #[test]
    fn text_strings_roundtrip(value in r#"[a-zA-Z0-9<>&"' \]\-\t\né]{1,32}"#) {
        prop_assert_eq!(through_text(value.clone()), value);
    }

    #[test]
    fn cdata_roundtrips_even_with_its_terminator(
        head in r#"[a-z<>&\] ]{0,12}"#,
        tail in r#"[a-z<>&\] ]{1,12}"#,
        split in any::<bool>(),
    ) {
        let content = if split { format!("{head}]]>{tail}") } else { format!("{head}{tail}") };
        prop_assert_eq!(through_cdata(&content), content);
    }

    #[test]
    fn comments_roundtrip_or_are_rejected(content in "[a-z <>&-]{0,16}") {
        let mut doc = Document::parse("<v/>").unwrap();
        let v = doc.root_element().unwrap();
        match v.append_comment(&mut doc, &content) {
            Ok(_) => {
                let reparsed = reparse(&doc);
                let v = reparsed.root_element().unwrap();
                let comment = v.first_child::<kind::Comment>(&reparsed).unwrap();
                prop_assert_eq!(comment.value(&reparsed).unwrap(), content.as_str());
            }
            Err(err) => {
                prop_assert_eq!(err.kind(), ErrorKind::Conversion);
                prop_assert!(content.contains("--") || content.ends_with('-'));
            }
        }
    }
}
