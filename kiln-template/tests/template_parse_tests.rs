use kiln_template::{Node, ParseError, TemplateAttr, parse_markup};

#[test]
fn parse_element_with_text() {
    let ast = parse_markup("<div>hi</div>").unwrap();
    assert_eq!(ast.len(), 1);
    match &ast[0] {
        Node::Element { tag, children, .. } => {
            assert_eq!(tag, "div");
            assert_eq!(children, &vec![Node::Text("hi".into())]);
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn parse_attributes() {
    let ast = parse_markup(r#"<input class="x" disabled value='a &amp; b'/>"#).unwrap();
    match &ast[0] {
        Node::Element { attrs, children, .. } => {
            assert!(children.is_empty());
            assert_eq!(
                attrs,
                &vec![
                    TemplateAttr { name: "class".into(), value: "x".into() },
                    TemplateAttr { name: "disabled".into(), value: String::new() },
                    TemplateAttr { name: "value".into(), value: "a & b".into() },
                ]
            );
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn marker_tags_parse_as_elements() {
    let ast = parse_markup(r#"<p block-handler-0="click"><block-text-1/><block-child-2></block-child-2></p>"#)
        .unwrap();
    let Node::Element { children, attrs, .. } = &ast[0] else {
        panic!("expected element")
    };
    assert_eq!(attrs[0].name, "block-handler-0");
    assert_eq!(children[0].tag(), Some("block-text-1"));
    assert_eq!(children[1].tag(), Some("block-child-2"));
}

#[test]
fn void_elements_may_omit_end_tag() {
    let ast = parse_markup("<p>a<br>b<img src=\"x.png\"></p>").unwrap();
    let Node::Element { children, .. } = &ast[0] else {
        panic!("expected element")
    };
    assert_eq!(children.len(), 4);
    assert_eq!(children[1].tag(), Some("br"));
    assert_eq!(children[3].tag(), Some("img"));

    let closed = parse_markup("<br></br>").unwrap();
    assert_eq!(closed.len(), 1);
}

#[test]
fn comments_and_other_nodes() {
    let ast = parse_markup("<!-- c --><![CDATA[x]]><!DOCTYPE html><?xml v?>").unwrap();
    let kinds: Vec<_> = ast.iter().map(Node::kind).collect();
    assert_eq!(kinds, ["comment", "CDATA", "doctype", "processing instruction"]);
    assert_eq!(ast[0], Node::Comment(" c ".into()));
    assert_eq!(ast[2], Node::Doctype("html".into()));
}

#[test]
fn multiple_roots_and_whitespace_are_preserved() {
    let ast = parse_markup(" <a></a>\n<b></b> ").unwrap();
    assert_eq!(ast.len(), 5);
    assert!(ast[0].is_whitespace_text());
}

#[test]
fn mismatched_close_tag_is_an_error() {
    let err = parse_markup("<div><span></div></span>").unwrap_err();
    let ParseError::Syntax { line, .. } = err;
    assert_eq!(line, 1);
    assert!(parse_markup("<div>").is_err());
    assert!(parse_markup("</div>").is_err());
    assert!(parse_markup("<div a=\"1></div>").is_err());
}

#[test]
fn error_reports_line_and_column() {
    let err = parse_markup("<ul>\n  <li>\n</ul>").unwrap_err();
    assert!(err.to_string().starts_with("malformed markup at "));
    let ParseError::Syntax { line, column, .. } = err;
    assert!(line >= 2, "line {line} column {column}");
}
