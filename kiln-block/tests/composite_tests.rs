use kiln_block::{compile, html, mount, multi, patch, remove, text, toggler};
use kiln_dom::{Document, NodeId, Value};

fn container() -> (Document, NodeId) {
    let mut dom = Document::new();
    let root = dom.create_element("div");
    (dom, root)
}

#[test]
fn multi_keeps_positions_of_absent_children() {
    let (mut dom, root) = container();
    let mut node = multi(vec![Some(text("a")), None, Some(text("c"))]);
    mount(&mut dom, &mut node, root);
    assert_eq!(dom.inner_html(root), "ac");

    patch(&mut dom, &mut node, multi(vec![Some(text("a")), Some(text("b")), Some(text("c"))]));
    assert_eq!(dom.inner_html(root), "abc");
    // the placeholder gave way to the child
    assert_eq!(dom.children(root).count(), 3);

    patch(&mut dom, &mut node, multi(vec![None, Some(text("b")), None]));
    assert_eq!(dom.inner_html(root), "b");

    patch(&mut dom, &mut node, multi(vec![Some(text("A")), Some(text("B")), Some(text("C"))]));
    assert_eq!(dom.inner_html(root), "ABC");
    assert_eq!(dom.children(root).count(), 3);
}

#[test]
fn multi_inside_a_block() {
    let block = compile("<p><block-child-0/></p>").unwrap();
    let item = compile("<b><block-text-0/></b>").unwrap();
    let (mut dom, root) = container();
    let children = |first: bool| {
        multi(vec![
            first.then(|| item.create([Value::from("1")], vec![])),
            Some(item.create([Value::from("2")], vec![])),
        ])
    };
    let mut node = block.create(Vec::<Value>::new(), vec![Some(children(false))]);
    mount(&mut dom, &mut node, root);
    assert_eq!(dom.inner_html(root), "<p><b>2</b></p>");
    patch(&mut dom, &mut node, block.create(Vec::<Value>::new(), vec![Some(children(true))]));
    assert_eq!(dom.inner_html(root), "<p><b>1</b><b>2</b></p>");

    remove(&mut dom, &mut node);
    assert_eq!(dom.inner_html(root), "");
}

#[test]
fn toggler_patches_on_same_key_and_replaces_otherwise() {
    let (mut dom, root) = container();
    let tail = dom.create_element("hr");
    dom.append_child(root, tail);
    let a = compile("<span><block-text-0/></span>").unwrap();
    let b = compile("<strong><block-text-0/></strong>").unwrap();

    let mut node = toggler("a", a.create([Value::from(1)], vec![]));
    node.mount(&mut dom, root, Some(tail));
    let span = dom.first_child(root).unwrap();

    patch(&mut dom, &mut node, toggler("a", a.create([Value::from(2)], vec![])));
    assert_eq!(dom.inner_html(root), "<span>2</span><hr>");
    assert_eq!(dom.first_child(root), Some(span));

    patch(&mut dom, &mut node, toggler("b", b.create([Value::from(3)], vec![])));
    assert_eq!(dom.inner_html(root), "<strong>3</strong><hr>");
    assert!(!dom.contains(span));

    // same template, new key: still a fresh element
    let strong = dom.first_child(root).unwrap();
    patch(&mut dom, &mut node, toggler("c", b.create([Value::from(3)], vec![])));
    assert_ne!(dom.first_child(root), Some(strong));
    assert_eq!(dom.inner_html(root), "<strong>3</strong><hr>");
}

#[test]
fn text_nodes_coerce_values() {
    let (mut dom, root) = container();
    let mut node = text(42);
    mount(&mut dom, &mut node, root);
    assert_eq!(dom.inner_html(root), "42");

    dom.reset_stats();
    patch(&mut dom, &mut node, text(42));
    assert!(dom.stats().is_clean());

    patch(&mut dom, &mut node, text(Value::Null));
    assert_eq!(dom.inner_html(root), "");
    patch(&mut dom, &mut node, text(false));
    assert_eq!(dom.inner_html(root), "false");
    patch(&mut dom, &mut node, text(Value::list([1.into(), 2.into()])));
    assert_eq!(dom.inner_html(root), "1,2");
    patch(&mut dom, &mut node, text("<tag> & co"));
    assert_eq!(dom.inner_html(root), "&lt;tag&gt; &amp; co");
    assert_eq!(node.to_html(&dom), "&lt;tag&gt; &amp; co");
}

#[test]
fn html_replaces_its_content() {
    let (mut dom, root) = container();
    let tail = dom.create_element("hr");
    dom.append_child(root, tail);

    let mut node = html("<b>bold</b> and <i>italic</i>");
    node.mount(&mut dom, root, Some(tail));
    assert_eq!(dom.inner_html(root), "<b>bold</b> and <i>italic</i><hr>");
    assert_eq!(node.to_html(&dom), "<b>bold</b> and <i>italic</i>");

    dom.reset_stats();
    patch(&mut dom, &mut node, html("<b>bold</b> and <i>italic</i>"));
    assert!(dom.stats().is_clean());

    patch(&mut dom, &mut node, html("<u>new</u>"));
    assert_eq!(dom.inner_html(root), "<u>new</u><hr>");

    // empty markup still owns a node to anchor on
    patch(&mut dom, &mut node, html(""));
    assert_eq!(dom.inner_html(root), "<hr>");
    assert!(node.first_node().is_some());

    patch(&mut dom, &mut node, html("<p>back</p>"));
    assert_eq!(dom.inner_html(root), "<p>back</p><hr>");
}

#[test]
fn unparseable_html_is_shown_as_text() {
    let (mut dom, root) = container();
    let mut node = html("<div>unclosed");
    mount(&mut dom, &mut node, root);
    assert_eq!(dom.inner_html(root), "&lt;div&gt;unclosed");
}
