//! CSV export of campaign responses

use serde_json::Value;

use crate::db::responses::ExportRow;

const HEADER: &str = "responseId,questionId,questionText,value,createdAt";

/// Render export rows as CSV, one line per answered item
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&escape_field(&row.response_id.to_string()));
        out.push(',');
        out.push_str(&escape_field(&row.question_id.to_string()));
        out.push(',');
        out.push_str(&escape_field(&row.question_text));
        out.push(',');
        out.push_str(&escape_field(&value_cell(&row.value)));
        out.push(',');
        out.push_str(&escape_field(&row.created_at));
        out.push('\n');
    }
    out
}

/// Cell text for a stored answer: bare strings, empty for null, JSON
/// serialization for arrays and objects
fn value_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Quote a field when it contains a comma, quote, or newline; embedded
/// quotes are doubled
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn row(text: &str, value: Value) -> ExportRow {
        ExportRow {
            response_id: Uuid::nil(),
            question_id: Uuid::nil(),
            question_text: text.to_string(),
            value,
            created_at: "2025-06-01T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn header_always_present() {
        let csv = to_csv(&[]);
        assert_eq!(csv, "responseId,questionId,questionText,value,createdAt\n");
    }

    #[test]
    fn plain_values_unquoted() {
        let csv = to_csv(&[row("How satisfied?", json!("great"))]);
        let line = csv.lines().nth(1).unwrap();
        assert!(line.contains(",How satisfied?,great,"));
    }

    #[test]
    fn commas_and_quotes_escaped() {
        let csv = to_csv(&[row("Pick one, please", json!("she said \"hi\""))]);
        let line = csv.lines().nth(1).unwrap();
        assert!(line.contains("\"Pick one, please\""));
        assert!(line.contains("\"she said \"\"hi\"\"\""));
    }

    #[test]
    fn arrays_serialize_as_json() {
        let csv = to_csv(&[row("Select all", json!(["a", "b"]))]);
        let line = csv.lines().nth(1).unwrap();
        // JSON text carries commas and quotes, so the cell is quoted
        assert!(line.contains("\"[\"\"a\"\",\"\"b\"\"]\""));
    }

    #[test]
    fn null_becomes_empty_cell() {
        let csv = to_csv(&[row("Anything else?", Value::Null)]);
        let line = csv.lines().nth(1).unwrap();
        assert!(line.contains("Anything else?,,"));
    }

    #[test]
    fn numbers_and_bools_are_bare() {
        let csv = to_csv(&[row("Rate", json!(7)), row("Agree", json!(true))]);
        assert!(csv.contains(",Rate,7,"));
        assert!(csv.contains(",Agree,true,"));
    }
}
