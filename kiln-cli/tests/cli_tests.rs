use std::fs;
use std::path::PathBuf;

fn template(name: &str, markup: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../target/kiln-cli-tests")
        .join(format!("{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).expect("create test dir");
    let path = dir.join("template.html");
    fs::write(&path, markup).expect("write template");
    path
}

#[test]
fn inspect_prints_the_context() {
    let input = template("inspect", "<div><p><block-text-0/></p><block-child-0/></div>\n");
    let out = kiln_cli::inspect_cmd(&input, false).expect("inspect");
    assert!(out.starts_with("template: <div><p></p></div>\n"), "{out}");
    assert!(out.contains("refs: 4"), "{out}");
    assert!(out.contains("child slots: 1"), "{out}");
    assert!(out.contains("locations"), "{out}");
}

#[test]
fn render_fills_data_slots() {
    let input = template(
        "render",
        "<ul>\n  <li block-attribute-1=\"class\"><block-text-0/></li>\n  <li><block-text-2/></li>\n</ul>\n",
    );
    let data = ["first", "on", "2"].map(String::from);
    let out = kiln_cli::render_cmd(&input, &data, false).expect("render");
    assert_eq!(out, "<ul><li class=\"on\">first</li><li>2</li></ul>");
}

#[test]
fn keep_whitespace_is_honored() {
    let input = template("whitespace", "<p> <b>x</b> </p>");
    let out = kiln_cli::render_cmd(&input, &[], true).expect("render");
    assert_eq!(out, "<p> <b>x</b> </p>");
}

#[test]
fn compile_errors_name_the_file() {
    let input = template("broken", "<a><b></a>");
    let err = kiln_cli::render_cmd(&input, &[], false).unwrap_err();
    assert!(format!("{err:#}").contains("failed to compile"), "{err:#}");
    assert!(err.root_cause().to_string().contains("malformed markup"), "{err:#}");
}

#[test]
fn missing_files_are_reported() {
    let err = kiln_cli::inspect_cmd(&PathBuf::from("/nonexistent/kiln.html"), false).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}
