use serde_json::Value;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Evaluates a path query against an untyped object
pub trait PathEvaluator: Send + Sync {
    fn evaluate(&self, path: &str, obj: &Value) -> anyhow::Result<Value>;
}

impl<F> PathEvaluator for F
where
    F: Fn(&str, &Value) -> anyhow::Result<Value> + Send + Sync,
{
    fn evaluate(&self, path: &str, obj: &Value) -> anyhow::Result<Value> {
        self(path, obj)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path \"{path}\": {reason}")]
    Invalid { path: String, reason: String },

    #[error("failed to find results for path \"{0}\"")]
    NoResults(String),
}

/// Evaluator for the subset of jsonpath used when writing expectations
/// against Kubernetes objects: `metadata.labels`, `{.spec.ref.branch}`,
/// `spec.containers[0].image`, `metadata.labels['app.kubernetes.io/component']`
/// or `metadata.labels.app\.kubernetes\.io/component`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldPathEvaluator;

impl PathEvaluator for FieldPathEvaluator {
    fn evaluate(&self, path: &str, obj: &Value) -> anyhow::Result<Value> {
        Ok(lookup(path, obj)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// Resolves `path` inside of `obj`
pub fn lookup(path: &str, obj: &Value) -> Result<Value, PathError> {
    let segments = parse(path)?;

    let mut current = obj;
    for segment in &segments {
        let next = match (segment, current) {
            (Segment::Field(name), Value::Object(map)) => map.get(name),
            (Segment::Index(idx), Value::Array(items)) => items.get(*idx),
            _ => None,
        };
        current = next.ok_or_else(|| PathError::NoResults(path.to_owned()))?;
    }

    Ok(current.clone())
}

fn parse(path: &str) -> Result<Vec<Segment>, PathError> {
    let invalid = |reason: &str| PathError::Invalid {
        path: path.to_owned(),
        reason: reason.to_owned(),
    };

    let mut expr = path.trim();
    if let Some(inner) = expr.strip_prefix('{') {
        expr = inner
            .strip_suffix('}')
            .ok_or_else(|| invalid("unclosed '{'"))?;
    }
    let expr = expr.strip_prefix('.').unwrap_or(expr);

    let mut segments = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '[' => {
                chars.next();
                segments.push(parse_bracket(&mut chars).map_err(|r| invalid(&r))?);
            }
            '.' if !segments.is_empty() => {
                chars.next();
                if matches!(chars.peek(), None | Some('.') | Some('[')) {
                    return Err(invalid("empty field name"));
                }
                segments.push(parse_name(&mut chars).map_err(|r| invalid(&r))?);
            }
            _ if segments.is_empty() => {
                segments.push(parse_name(&mut chars).map_err(|r| invalid(&r))?);
            }
            _ => return Err(invalid(&format!("unexpected '{c}'"))),
        }
    }

    Ok(segments)
}

fn parse_name(chars: &mut Peekable<Chars>) -> Result<Segment, String> {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        match c {
            '.' | '[' => break,
            '\\' => {
                chars.next();
                match chars.next() {
                    Some(escaped) => name.push(escaped),
                    None => return Err("dangling escape".to_owned()),
                }
                continue;
            }
            ']' | '{' | '}' | '\'' | '"' => return Err(format!("unexpected '{c}'")),
            '*' | '@' | '?' | '$' => return Err(format!("'{c}' is not supported")),
            _ => name.push(c),
        }
        chars.next();
    }

    if name.is_empty() {
        return Err("empty field name".to_owned());
    }
    Ok(Segment::Field(name))
}

fn parse_bracket(chars: &mut Peekable<Chars>) -> Result<Segment, String> {
    let segment = match chars.peek() {
        Some(&quote) if quote == '\'' || quote == '"' => {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next() {
                    Some(c) if c == quote => break,
                    Some('\\') => match chars.next() {
                        Some(escaped) => key.push(escaped),
                        None => return Err("unterminated quoted key".to_owned()),
                    },
                    Some(c) => key.push(c),
                    None => return Err("unterminated quoted key".to_owned()),
                }
            }
            Segment::Field(key)
        }
        _ => {
            let mut index = String::new();
            while let Some(&c) = chars.peek() {
                if c == ']' {
                    break;
                }
                index.push(c);
                chars.next();
            }
            let index = index
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid array index '{index}'"))?;
            Segment::Index(index)
        }
    };

    match chars.next() {
        Some(']') => Ok(segment),
        _ => Err("unterminated '['".to_owned()),
    }
}
