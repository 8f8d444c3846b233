use anyhow::{Context, Result, anyhow};
use carto_template_testing::jsonpath::lookup;
use carto_template_testing::resources::TemplateSpec;
use carto_template_testing::{TemplateEngine, TemplatingContext};
use serde_json::{Map, Value, json};

/// Stand-in for the Cartographer stamping engine. Only simple templates
/// (`spec.template`) are supported:
///
/// * `$(path)$` placeholders are resolved against the templating context
/// * mapping entries resolving to `null`, and mappings left empty, are dropped
/// * the labels of the owner are merged with the ones of the template
/// * the owner is set as controller of the stamped object
pub(crate) struct FakeCartographer;

impl TemplateEngine for FakeCartographer {
    fn stamp(&self, owner: &Value, context: &TemplatingContext, spec: &TemplateSpec) -> Result<Value> {
        let template = spec
            .template
            .as_ref()
            .ok_or_else(|| anyhow!("only spec.template is supported"))?;
        let data = context.to_value()?;

        let mut stamped = interpolate(template, &data)?.unwrap_or(Value::Null);
        merge_labels(&mut stamped, owner);
        set_owner_reference(&mut stamped, owner);

        Ok(stamped)
    }
}

fn interpolate(template: &Value, data: &Value) -> Result<Option<Value>> {
    let value = match template {
        Value::String(s) => interpolate_string(s, data)?,
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| Ok(interpolate(item, data)?.unwrap_or(Value::Null)))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Object(map) => {
            let mut res = Map::new();
            for (key, value) in map {
                if let Some(value) = interpolate(value, data)? {
                    res.insert(key.clone(), value);
                }
            }
            if res.is_empty() && !map.is_empty() {
                return Ok(None);
            }
            Value::Object(res)
        }
        other => other.clone(),
    };

    Ok(match value {
        Value::Null => None,
        value => Some(value),
    })
}

fn interpolate_string(s: &str, data: &Value) -> Result<Value> {
    if let Some(path) = s.strip_prefix("$(").and_then(|s| s.strip_suffix(")$")) {
        if !path.contains(")$") {
            return resolve(path, data);
        }
    }

    let mut res = String::new();
    let mut rest = s;
    while let Some(start) = rest.find("$(") {
        let end = rest[start..]
            .find(")$")
            .ok_or_else(|| anyhow!("unterminated placeholder in '{s}'"))?;
        res.push_str(&rest[..start]);
        match resolve(&rest[start + 2..start + end], data)? {
            Value::String(v) => res.push_str(&v),
            v => res.push_str(&v.to_string()),
        }
        rest = &rest[start + end + 2..];
    }
    res.push_str(rest);

    Ok(Value::String(res))
}

fn resolve(path: &str, data: &Value) -> Result<Value> {
    lookup(path, data).with_context(|| format!("unable to resolve $({path})$"))
}

fn merge_labels(stamped: &mut Value, owner: &Value) {
    let mut labels = owner["metadata"]["labels"]
        .as_object()
        .cloned()
        .unwrap_or_default();
    if let Some(template_labels) = stamped["metadata"]["labels"].as_object() {
        labels.extend(template_labels.clone());
    }
    if !labels.is_empty() {
        stamped["metadata"]["labels"] = Value::Object(labels);
    }
}

fn set_owner_reference(stamped: &mut Value, owner: &Value) {
    if owner.get("apiVersion").is_none() || owner.get("kind").is_none() {
        return;
    }

    stamped["metadata"]["ownerReferences"] = json!([{
        "apiVersion": owner["apiVersion"],
        "kind": owner["kind"],
        "name": owner["metadata"]["name"],
        "uid": owner["metadata"]["uid"].as_str().unwrap_or_default(),
        "controller": true,
        "blockOwnerDeletion": true,
    }]);
}
