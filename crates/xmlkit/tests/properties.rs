/*
 * properties.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Behavioral contracts of the access layer, exercised through the public
 * API only.
 */

use xmlkit::{Document, End, ErrorKind, kind};

fn doc(xml: &str) -> Document {
    Document::parse(xml).unwrap()
}

#[test]
fn missing_attribute_is_absence_unless_defaulted() {
    let doc = doc(r#"<item present="5"/>"#);
    let item = doc.root_element().unwrap();

    let err = item.attribute::<i32>(&doc, "missing").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Absence);
    assert_eq!(err.to_string(), "absence: <item> has no attribute 'missing' (at 1:1)");

    assert_eq!(item.attribute_or(&doc, "missing", 99).unwrap(), 99);
    assert_eq!(item.attribute_or(&doc, "present", 99).unwrap(), 5);
}

#[test]
fn malformed_numbers_are_conversion_errors() {
    let doc = doc(r#"<item count="12abc" padded="  42  "/>"#);
    let item = doc.root_element().unwrap();

    let err = item.attribute::<i32>(&doc, "count").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    insta::assert_snapshot!(
        err.to_string(),
        @"conversion: '12abc' is not a valid i32 (at 1:1, attribute 'count' on <item>)"
    );
    assert_eq!(item.attribute::<i32>(&doc, "padded").unwrap(), 42);
}

#[test]
fn element_filter_yields_elements_in_order_then_end() {
    let doc = doc("<r><A/>text<B/><!--note--><C/></r>");
    let r = doc.root_element().unwrap();

    let mut cursor = r.cursor::<kind::Element>();
    let mut seen = Vec::new();
    cursor.advance(&doc).unwrap();
    while cursor != End {
        seen.push(cursor.current().unwrap().name(&doc).unwrap().to_string());
        cursor.advance(&doc).unwrap();
    }
    assert_eq!(seen, ["A", "B", "C"]);
    assert!(cursor == End);

    for _ in 0..3 {
        cursor.advance(&doc).unwrap();
        assert!(cursor == End);
    }
}

#[test]
fn comment_view_of_element_is_kind_mismatch() {
    let doc = doc("<r><e/></r>");
    let e = doc.root_element().unwrap().first_child::<kind::Any>(&doc).unwrap();

    let err = e.cast::<kind::Comment>(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KindMismatch);
    let err = doc.handle::<kind::Comment>(e.id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KindMismatch);
}

#[test]
fn setting_an_attribute_twice_overwrites() {
    let mut doc = doc("<e/>");
    let e = doc.root_element().unwrap();
    e.set_attribute(&mut doc, "x", 1).unwrap();
    e.set_attribute(&mut doc, "x", 2).unwrap();

    assert_eq!(e.attributes(&doc).unwrap().count(), 1);
    assert_eq!(e.attribute::<i32>(&doc, "x").unwrap(), 2);
    assert_eq!(doc.to_xml_string().unwrap(), r#"<e x="2"/>"#);
}

#[test]
fn removing_a_non_child_fails_and_changes_nothing() {
    let mut doc = doc("<r><a><grandchild/></a><b/></r>");
    let r = doc.root_element().unwrap();
    let a = r.first_child_element(&doc, "a").unwrap();
    let grandchild = a.first_child_element(&doc, "grandchild").unwrap();
    let before = doc.to_xml_string().unwrap();

    let err = r.remove_child(&mut doc, grandchild).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    assert_eq!(doc.to_xml_string().unwrap(), before);
    assert!(grandchild.is_alive(&doc));
}

#[test]
fn removed_nodes_make_handles_stale() {
    let mut doc = doc("<r><a x='1'><inner>t</inner></a></r>");
    let r = doc.root_element().unwrap();
    let a = r.first_child_element(&doc, "a").unwrap();
    let inner = a.first_child_element(&doc, "inner").unwrap();
    let text = inner.first_child::<kind::Text>(&doc).unwrap();

    r.remove_child(&mut doc, a).unwrap();

    assert_eq!(a.name(&doc).unwrap_err().kind(), ErrorKind::StaleHandle);
    assert_eq!(
        a.attribute::<i32>(&doc, "x").unwrap_err().kind(),
        ErrorKind::StaleHandle
    );
    assert_eq!(
        inner.parent(&doc).unwrap_err().kind(),
        ErrorKind::StaleHandle
    );
    assert_eq!(text.value(&doc).unwrap_err().kind(), ErrorKind::StaleHandle);
    assert_eq!(
        r.remove_child(&mut doc, a).unwrap_err().kind(),
        ErrorKind::StaleHandle
    );
    assert_eq!(doc.to_xml_string().unwrap(), "<r/>");
}

#[test]
fn typed_text_roundtrips_through_elements() {
    let mut doc = doc("<values/>");
    let values = doc.root_element().unwrap();

    let int = values.append_element(&mut doc, "int").unwrap();
    int.set_text(&mut doc, -12345i64).unwrap();
    let float = values.append_element(&mut doc, "float").unwrap();
    float.set_text(&mut doc, 0.1f64 + 0.2).unwrap();
    let flag = values.append_element(&mut doc, "flag").unwrap();
    flag.set_text(&mut doc, true).unwrap();

    assert_eq!(int.text::<i64>(&doc).unwrap(), -12345);
    assert_eq!(float.text::<f64>(&doc).unwrap(), 0.1 + 0.2);
    assert!(flag.text::<bool>(&doc).unwrap());
    insta::assert_snapshot!(
        doc.to_xml_string().unwrap(),
        @"<values><int>-12345</int><float>0.30000000000000004</float><flag>true</flag></values>"
    );
}

#[test]
fn handles_can_be_shared_and_compared() {
    let doc = doc("<r><a/></r>");
    let r = doc.root_element().unwrap();
    let first = r.first_child_element(&doc, "a").unwrap();
    let again = r.first_child::<kind::Element>(&doc).unwrap();
    assert_eq!(first, again);
    assert_eq!(first.as_node(), again.as_node());

    let set: std::collections::HashSet<_> = [first, again].into_iter().collect();
    assert_eq!(set.len(), 1);
}
