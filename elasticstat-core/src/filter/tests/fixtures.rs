use serde_json::{Value, json};

/// One bulk response item: `(action, index, error)`.
pub(crate) type Item<'a> = (&'a str, &'a str, Option<Value>);

pub(crate) fn bulk_response(items: &[Item<'_>]) -> String {
    let items: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, (action, index, error))| {
            let mut result = json!({ "_index": index, "_type": "doc", "_id": i.to_string() });
            match error {
                Some(error) => {
                    result["status"] = json!(400);
                    result["error"] = error.clone();
                }
                None => result["status"] = json!(201),
            }
            json!({ *action: result })
        })
        .collect();

    json!({ "took": 12, "items": items }).to_string()
}

pub(crate) fn mapper_error() -> Value {
    json!("MapperParsingException[failed to parse [bytes]]")
}
