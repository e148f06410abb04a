use serde::Serialize;
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Every value wrapped in double quotes.
    Always,
    /// Only values containing the delimiter, a quote or a line break.
    Necessary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvLayout {
    pub delimiter: char,
    pub header: bool,
    pub quoting: Quoting,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            delimiter: ';',
            header: true,
            quoting: Quoting::Always,
        }
    }
}

/// Renders flat records as CSV. The header is the first record's field
/// names in declaration order; later records are projected onto it. No
/// records means an empty document, header included.
pub fn to_csv<T: Serialize>(records: &[T], layout: &CsvLayout) -> Result<String, serde_json::Error> {
    let rows = records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(<serde_json::Error as serde::ser::Error>::custom(
                "CSV records must serialize to flat objects",
            )),
        })
        .collect::<Result<Vec<Map<String, Value>>, _>>()?;

    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let headers: Vec<&String> = first.keys().collect();
    let delimiter = layout.delimiter.to_string();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    if layout.header {
        lines.push(
            headers
                .iter()
                .map(|h| escape(h, layout))
                .collect::<Vec<_>>()
                .join(&delimiter),
        );
    }
    for row in &rows {
        lines.push(
            headers
                .iter()
                .map(|h| escape(&stringify(row.get(h.as_str())), layout))
                .collect::<Vec<_>>()
                .join(&delimiter),
        );
    }

    Ok(lines.join("\n"))
}

fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_text(n),
        Some(other) => other.to_string(),
    }
}

// Integral floats print without a fraction, so a price of 10.0 reads "10".
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

fn escape(raw: &str, layout: &CsvLayout) -> String {
    let needs_quotes = match layout.quoting {
        Quoting::Always => true,
        Quoting::Necessary => {
            raw.contains(layout.delimiter) || raw.contains(['"', '\n', '\r'])
        }
    };
    if needs_quotes {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Row {
        id_product: i64,
        description: String,
        price: f64,
    }

    fn row(id: i64, description: &str, price: f64) -> Row {
        Row { id_product: id, description: description.to_string(), price }
    }

    #[test]
    fn empty_input_is_empty_document() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(to_csv(&rows, &CsvLayout::default()).unwrap(), "");
    }

    #[test]
    fn bare_line_without_header() {
        let layout = CsvLayout { delimiter: ';', header: false, quoting: Quoting::Necessary };
        let csv = to_csv(&[row(1, "Product 1", 10.0)], &layout).unwrap();
        assert_eq!(csv, "1;Product 1;10");
    }

    #[test]
    fn default_layout_quotes_everything() {
        let csv = to_csv(&[row(1, "Product 1", 10.0), row(2, "Product 2", 20.5)], &CsvLayout::default()).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[0], "\"idProduct\";\"description\";\"price\"");
        assert_eq!(lines[1], "\"1\";\"Product 1\";\"10\"");
        assert_eq!(lines[2], "\"2\";\"Product 2\";\"20.5\"");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn quotes_are_doubled() {
        let layout = CsvLayout { quoting: Quoting::Necessary, ..CsvLayout::default() };
        let csv = to_csv(&[row(3, "12\" pipe; steel", 1.0)], &layout).unwrap();
        assert_eq!(csv, "idProduct;description;price\n3;\"12\"\" pipe; steel\";1");
    }

    #[test]
    fn comma_delimiter_applies_to_header_too() {
        let layout = CsvLayout { delimiter: ',', header: true, quoting: Quoting::Necessary };
        let csv = to_csv(&[row(1, "a,b", 0.25)], &layout).unwrap();
        assert_eq!(csv, "idProduct,description,price\n1,\"a,b\",0.25");
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(to_csv(&[1, 2, 3], &CsvLayout::default()).is_err());
    }
}
