//! JSON-LD and microdata discovery

use crate::page::StructuredDataEntry;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::OnceLock;

fn json_ld_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| {
        Selector::parse("script[type='application/ld+json']").expect("static selector")
    })
}

fn microdata_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("[itemscope][itemtype]").expect("static selector"))
}

/// Every schema entry on the page: JSON-LD blocks first, then microdata items.
pub fn extract_structured_data(document: &Html) -> Vec<StructuredDataEntry> {
    let mut entries = Vec::new();

    for script in document.select(json_ld_selector()) {
        let body: String = script.text().collect();
        match serde_json::from_str::<Value>(body.trim()) {
            Ok(value) => collect_json_ld(&value, true, &mut entries),
            Err(e) => entries.push(StructuredDataEntry {
                schema_type: "Unknown".to_string(),
                valid: false,
                errors: vec![format!("Invalid JSON: {e}")],
            }),
        }
    }

    for el in document.select(microdata_selector()) {
        let Some(itemtype) = el.value().attr("itemtype") else {
            continue;
        };
        // itemtype may hold several space-separated URLs; the first names the item
        let Some(first) = itemtype.split_whitespace().next() else {
            continue;
        };
        entries.push(StructuredDataEntry {
            schema_type: short_type_name(first),
            valid: true,
            errors: Vec::new(),
        });
    }

    entries
}

fn collect_json_ld(value: &Value, top_level: bool, entries: &mut Vec<StructuredDataEntry>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_json_ld(item, top_level, entries);
            }
        }
        Value::Object(map) => {
            // A bare @graph container carries its context for every node
            if let Some(graph) = map.get("@graph").and_then(Value::as_array) {
                if !map.contains_key("@type") {
                    let has_context = map.contains_key("@context");
                    for node in graph {
                        collect_json_ld(node, top_level && !has_context, entries);
                    }
                    return;
                }
            }

            let mut errors = Vec::new();
            let schema_type = match map.get("@type") {
                Some(Value::String(t)) => t.clone(),
                Some(Value::Array(types)) => types
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => {
                    errors.push("Missing @type".to_string());
                    "Unknown".to_string()
                }
            };
            if top_level && !map.contains_key("@context") {
                errors.push("Missing @context".to_string());
            }

            entries.push(StructuredDataEntry {
                schema_type,
                valid: errors.is_empty(),
                errors,
            });
        }
        _ => entries.push(StructuredDataEntry {
            schema_type: "Unknown".to_string(),
            valid: false,
            errors: vec!["Expected a JSON object".to_string()],
        }),
    }
}

fn short_type_name(itemtype: &str) -> String {
    itemtype
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(itemtype)
        .to_string()
}
