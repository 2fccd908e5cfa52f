use anyhow::{Context, Result};
use kiln_block::{CompiledBlock, Value, compile, config, render_to_string};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Read and compile the template at `input`.
pub fn load_template(input: &Path, keep_whitespace: bool) -> Result<Rc<CompiledBlock>> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    if keep_whitespace {
        config::configure(|c| c.normalize_whitespace = false);
    }
    let compiled = compile(&src);
    config::reset();
    compiled.with_context(|| format!("failed to compile {}", input.display()))
}

/// Static markup plus the compiled context, as printed by `kiln inspect`.
pub fn inspect_cmd(input: &Path, keep_whitespace: bool) -> Result<String> {
    let block = load_template(input, keep_whitespace)?;
    let ctx = block.context();
    let mut out = String::new();
    writeln!(out, "template: {}", block.template_html())?;
    writeln!(out, "refs: {}", ctx.ref_count)?;
    writeln!(out, "child slots: {}", ctx.child_capacity())?;
    writeln!(out, "{:#?}", ctx)?;
    Ok(out)
}

/// Mount the template with `data` and return the resulting markup.
pub fn render_cmd(input: &Path, data: &[String], keep_whitespace: bool) -> Result<String> {
    let block = load_template(input, keep_whitespace)?;
    let data: Vec<Value> = data.iter().map(|raw| parse_value(raw)).collect();
    Ok(render_to_string(block.create(data, vec![])))
}

/// `null`, `true`, `false` and numbers keep their type; anything else is a string.
pub fn parse_value(raw: &str) -> Value {
    match raw {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::from(raw),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_values() {
        assert!(matches!(parse_value("null"), Value::Null));
        assert!(matches!(parse_value("true"), Value::Bool(true)));
        assert!(matches!(parse_value("2.5"), Value::Number(n) if n == 2.5));
        assert_eq!(parse_value("inf").as_str(), Some("inf"));
        assert_eq!(parse_value("hello").as_str(), Some("hello"));
    }
}
