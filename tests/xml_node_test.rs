//! Tests for XmlNode building and serialization

use bolsig2ctml::domain::xml::{MAX_LEVEL, XML_DECLARATION};
use bolsig2ctml::domain::{DomainError, XmlNode};

// ============================================================
// Building and lookup
// ============================================================

#[test]
fn given_children_with_same_name_when_looking_up_then_returns_last() {
    // Arrange
    let mut root = XmlNode::element("ctml");
    root.add_child("process", "first");
    root.add_child("process", "second");

    // Act
    let child = root.child("process").unwrap();

    // Assert
    assert_eq!(child.value(), "second");
    assert_eq!(root.num_children(), 2);
    let values: Vec<_> = root.children().map(XmlNode::value).collect();
    assert_eq!(values, vec!["first", "second"]);
}

#[test]
fn given_missing_child_when_looking_up_then_errors() {
    let root = XmlNode::element("ctml");

    let err = root.child("process").unwrap_err();

    assert_eq!(
        err,
        DomainError::MissingChild {
            node: "ctml".into(),
            name: "process".into()
        }
    );
}

#[test]
fn given_missing_attribute_when_looking_up_then_errors() {
    let mut root = XmlNode::element("ctml");
    root.set_attribute("id", "0");

    assert_eq!(root.attribute("id").unwrap(), "0");
    assert!(matches!(
        root.attribute("type"),
        Err(DomainError::MissingAttribute { .. })
    ));
}

#[test]
fn given_child_handle_when_mutating_then_changes_tree() {
    let mut root = XmlNode::element("ctml");
    root.add_child("process", "").set_attribute("type", "ELASTIC");
    root.child_mut("process")
        .unwrap()
        .add_child("reactants", "Ar");

    let process = root.child("process").unwrap();
    assert_eq!(process.attribute("type").unwrap(), "ELASTIC");
    assert_eq!(process.child("reactants").unwrap().value(), "Ar");
}

// ============================================================
// Serialization
// ============================================================

#[test]
fn given_empty_element_when_serializing_then_self_closes() {
    let node = XmlNode::element("foo");

    assert_eq!(node.to_markup(0).unwrap(), "<foo/>");
    assert_eq!(node.to_markup(4).unwrap(), "    <foo/>");
}

#[test]
fn given_comment_when_serializing_then_pads_with_spaces() {
    let mut root = XmlNode::element("r");
    root.add_comment("hello");
    root.add_comment(" already padded ");
    root.add_comment("");

    let out = root.to_markup(0).unwrap();

    assert_eq!(
        out,
        "<r>\n\n  <!-- hello -->\n\n  <!-- already padded -->\n\n  <!---->\n</r>"
    );
}

#[test]
fn given_nested_tree_when_serializing_then_indents_two_levels_per_depth() {
    // Arrange
    let mut root = XmlNode::element("ctml");
    let process = root.add_child("process", "");
    process.set_attribute("id", "0").set_attribute("type", "ELASTIC");
    process.add_child("reactants", "Ar");
    process.add_child("mass_ratio", 1.36e-5);

    // Act
    let doc = root.to_document().unwrap();

    // Assert
    let expected = concat!(
        "<?xml version=\"1.0\"?>\n",
        "<ctml>\n",
        "  <process id=\"0\" type=\"ELASTIC\">\n",
        "    <reactants>Ar</reactants>\n",
        "    <mass_ratio>1.36e-05</mass_ratio>\n",
        "  </process>\n",
        "</ctml>\n",
    );
    assert_eq!(doc, expected);
}

#[test]
fn given_multi_line_value_when_serializing_then_reindents_each_line() {
    let mut root = XmlNode::element("ctml");
    root.add_child("process", "")
        .add_child("data", "0.0 1.0 \n   1.0 0.5 \n");

    let out = root.to_markup(0).unwrap();

    assert_eq!(
        out,
        concat!(
            "<ctml>\n",
            "  <process>\n",
            "    <data>\n",
            "      0.0 1.0 \n",
            "      1.0 0.5 \n",
            "      </data>\n",
            "  </process>\n",
            "</ctml>",
        )
    );
}

#[test]
fn given_value_and_children_when_serializing_then_emits_both() {
    let mut root = XmlNode::element("a");
    let b = root.add_child("b", "text");
    b.add_child("c", "");

    assert_eq!(
        root.to_markup(0).unwrap(),
        "<a>\n  <b>text\n    <c/>\n  </b>\n</a>"
    );
}

#[test]
fn given_same_tree_when_serializing_twice_then_output_identical() {
    let mut root = XmlNode::element("ctml");
    root.add_child("x", "1\n2").set_attribute("k", "v");

    let first = root.to_document().unwrap();
    let second = root.to_document().unwrap();

    assert_eq!(first, second);
    assert!(first.starts_with(XML_DECLARATION));
    assert!(first.ends_with("</ctml>\n"));
}

#[test]
fn given_tree_deeper_than_indent_table_when_serializing_then_errors() {
    // Arrange: levels 0, 2, ..., 16
    let mut root = XmlNode::element("l0");
    let mut node = &mut root;
    for depth in 1..=8 {
        node = node.add_child(format!("l{depth}"), "");
    }

    // Act
    let err = root.to_document().unwrap_err();

    // Assert
    assert_eq!(
        err,
        DomainError::UnsupportedNestingDepth {
            level: 16,
            max: MAX_LEVEL
        }
    );
}

#[test]
fn given_tree_at_max_depth_when_serializing_then_succeeds() {
    let mut root = XmlNode::element("l0");
    let mut node = &mut root;
    for depth in 1..=7 {
        node = node.add_child(format!("l{depth}"), "");
    }

    let doc = root.to_document().unwrap();

    // level 14 uses the 15-space entry of the table
    assert!(doc.contains(&format!("\n{}<l7/>", " ".repeat(15))));
}
