//! Output renderers for CLI commands
//!
//! Paged results are rendered incrementally as pages arrive: as one JSON
//! array spanning all pages, or as one summary line per item.

use crate::error::{CliError, Result};
use crate::stream::PageHandler;
use console::style;
use serde_json::Value;
use std::io::Write;

/// Output format selected with `--json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Plain,
    /// Machine-readable JSON
    Json,
}

impl OutputFormat {
    /// Format for the `--json` flag value
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Plain
        }
    }
}

/// A page handler that can report how rendering went
pub trait Renderer: PageHandler {
    /// Error received from the stream or raised while writing, if any
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Create the renderer for `format` writing to `out`
pub fn renderer<'w, W: Write + 'w>(format: OutputFormat, out: W) -> Box<dyn Renderer + 'w> {
    match format {
        OutputFormat::Json => Box::new(JsonArrayRenderer::new(out)),
        OutputFormat::Plain => Box::new(PlainRenderer::new(out)),
    }
}

/// Writes every item of every page as one pretty-printed JSON array
#[derive(Debug)]
pub struct JsonArrayRenderer<W: Write> {
    out: W,
    opened: bool,
    error: Option<CliError>,
}

impl<W: Write> JsonArrayRenderer<W> {
    /// Render into `out`
    pub const fn new(out: W) -> Self {
        Self {
            out,
            opened: false,
            error: None,
        }
    }

    fn write_items(&mut self, items: &[Value]) -> Result<()> {
        for item in items {
            let separator = if self.opened { "," } else { "[" };
            self.opened = true;
            let text = serde_json::to_string_pretty(item)?;
            writeln!(self.out, "{separator}")?;
            write!(self.out, "{}", indent(&text))?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.opened {
            writeln!(self.out, "\n]")?;
        } else {
            writeln!(self.out, "[]")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn remember(&mut self, result: Result<()>) {
        if let Err(err) = result {
            let _ = self.error.get_or_insert(err);
        }
    }

    /// Consume the renderer and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PageHandler for JsonArrayRenderer<W> {
    fn on_page_received(&mut self, items: Vec<Value>) {
        let result = self.write_items(&items);
        self.remember(result);
    }

    fn on_last_page(&mut self) {
        let result = self.close();
        self.remember(result);
    }

    fn on_error(&mut self, error: CliError) {
        // Keep the output parseable up to the failure
        if self.opened {
            let result = self.close();
            self.remember(result);
        }
        self.error = Some(error);
    }
}

impl<W: Write> Renderer for JsonArrayRenderer<W> {
    fn finish(self: Box<Self>) -> Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}

/// Writes one summary line per item and a count at the end
#[derive(Debug)]
pub struct PlainRenderer<W: Write> {
    out: W,
    count: usize,
    error: Option<CliError>,
}

impl<W: Write> PlainRenderer<W> {
    /// Render into `out`
    pub const fn new(out: W) -> Self {
        Self {
            out,
            count: 0,
            error: None,
        }
    }

    /// Consume the renderer and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PageHandler for PlainRenderer<W> {
    fn on_page_received(&mut self, items: Vec<Value>) {
        for item in &items {
            if let Err(err) = writeln!(self.out, "{}", summary_line(item)) {
                let _ = self.error.get_or_insert(err.into());
                return;
            }
            self.count += 1;
        }
    }

    fn on_last_page(&mut self) {
        let noun = if self.count == 1 { "item" } else { "items" };
        if let Err(err) = writeln!(self.out, "{} {} {noun}", style("✓").green(), self.count) {
            let _ = self.error.get_or_insert(err.into());
        }
    }

    fn on_error(&mut self, error: CliError) {
        self.error = Some(error);
    }
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn finish(self: Box<Self>) -> Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}

/// Identifier fields, in order of preference
const ID_FIELDS: &[&str] = &["uuid", "unitId", "reference", "name", "id", "label"];

/// Secondary fields shown after the identifier when present
const DETAIL_FIELDS: &[&str] = &[
    "name",
    "status",
    "versionId",
    "eventType",
    "url",
    "label",
    "receptionDate",
];

/// One-line summary of a resource
#[must_use]
pub fn summary_line(item: &Value) -> String {
    let Value::Object(map) = item else {
        return scalar(item);
    };

    let id_field = ID_FIELDS.iter().find(|field| map.contains_key(**field));
    let Some(id_field) = id_field else {
        return item.to_string();
    };

    let mut line = scalar(&map[*id_field]);
    for field in DETAIL_FIELDS {
        if field == id_field {
            continue;
        }
        if let Some(value) = map.get(*field).filter(|v| !v.is_null()) {
            line.push_str(&format!("  {field}={}", scalar(value)));
        }
    }
    line
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single-shot result
pub fn render_value<W: Write>(value: &Value, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
        }
        OutputFormat::Plain => match value {
            Value::Object(map) => {
                for (key, field) in map {
                    if key.starts_with('_') {
                        continue;
                    }
                    writeln!(out, "{}: {}", style(key).bold(), scalar(field))?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    writeln!(out, "{}", summary_line(item))?;
                }
            }
            Value::Null => {}
            other => writeln!(out, "{}", scalar(other))?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_output(pages: &[Vec<Value>]) -> String {
        let mut renderer = JsonArrayRenderer::new(Vec::new());
        for page in pages {
            renderer.on_page_received(page.clone());
        }
        renderer.on_last_page();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn json_renderer_produces_one_array_across_pages() {
        let text = json_output(&[
            vec![json!({"uuid": "a"})],
            vec![],
            vec![json!({"uuid": "b"}), json!({"uuid": "c"})],
        ]);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!([{"uuid": "a"}, {"uuid": "b"}, {"uuid": "c"}])
        );
    }

    #[test]
    fn json_renderer_prints_empty_array_without_pages() {
        assert_eq!(json_output(&[]), "[]\n");
    }

    #[test]
    fn json_renderer_reports_stream_errors() {
        let mut renderer = Box::new(JsonArrayRenderer::new(Vec::new()));
        renderer.on_page_received(vec![json!(1)]);
        renderer.on_error(CliError::MissingToken);
        assert!(matches!(renderer.finish(), Err(CliError::MissingToken)));
    }

    #[test]
    fn plain_renderer_summarises_each_item() {
        let mut renderer = PlainRenderer::new(Vec::new());
        renderer.on_page_received(vec![
            json!({"uuid": "u1", "name": "Spring rollout", "status": "published"}),
            json!({"unitId": "dev-7", "versionId": "1.0.2"}),
        ]);
        renderer.on_last_page();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "u1  name=Spring rollout  status=published");
        assert_eq!(lines[1], "dev-7  versionId=1.0.2");
        assert!(lines[2].ends_with("2 items"));
    }

    #[test]
    fn summary_line_falls_back_to_json() {
        assert_eq!(summary_line(&json!({"x": 1})), r#"{"x":1}"#);
        assert_eq!(summary_line(&json!("plain")), "plain");
    }

    #[test]
    fn render_value_json_is_pretty() {
        let mut out = Vec::new();
        render_value(&json!({"a": 1}), OutputFormat::Json, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn render_value_plain_skips_hal_fields() {
        console::set_colors_enabled(false);
        let mut out = Vec::new();
        render_value(
            &json!({"email": "ops@example.com", "_links": {"self": {}}}),
            OutputFormat::Plain,
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "email: ops@example.com\n");
    }

    #[test]
    fn output_format_from_flag() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Plain);
    }
}
