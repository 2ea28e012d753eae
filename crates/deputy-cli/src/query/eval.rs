//! Evaluation of a parsed [`Filter`] against a JSON value.
//!
//! Every filter maps one input to zero or more outputs. Outputs are collected
//! eagerly; API responses are small enough that streaming buys nothing here.

use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

use super::parser::{Builtin, CmpOp, Filter};

/// Run `filter` against `input`, returning every output in order.
pub fn eval(filter: &Filter, input: &Value) -> Result<Vec<Value>, String> {
    match filter {
        Filter::Identity => Ok(vec![input.clone()]),
        Filter::Literal(value) => Ok(vec![value.clone()]),
        Filter::Field(target, name) => each(target, input, |v| field(&v, name).map(one)),
        Filter::Index(target, index) => each(target, input, |v| index_value(&v, *index).map(one)),
        Filter::Slice(target, start, end) => {
            each(target, input, |v| slice(&v, *start, *end).map(one))
        },
        Filter::Iterate(target) => each(target, input, iterate),
        Filter::Try(inner) => Ok(eval(inner, input).unwrap_or_default()),
        Filter::Pipe(left, right) => each(left, input, |v| eval(right, &v)),
        Filter::Comma(left, right) => {
            let mut out = eval(left, input)?;
            out.extend(eval(right, input)?);
            Ok(out)
        },
        Filter::Compare(left, op, right) => {
            let lhs = eval(left, input)?;
            let rhs = eval(right, input)?;
            let mut out = Vec::with_capacity(lhs.len() * rhs.len());
            for l in &lhs {
                for r in &rhs {
                    out.push(Value::Bool(compare_with(*op, l, r)));
                }
            }
            Ok(out)
        },
        Filter::And(left, right) => each(left, input, |l| {
            if !truthy(&l) {
                return Ok(vec![Value::Bool(false)]);
            }
            Ok(eval(right, input)?
                .iter()
                .map(|r| Value::Bool(truthy(r)))
                .collect())
        }),
        Filter::Or(left, right) => each(left, input, |l| {
            if truthy(&l) {
                return Ok(vec![Value::Bool(true)]);
            }
            Ok(eval(right, input)?
                .iter()
                .map(|r| Value::Bool(truthy(r)))
                .collect())
        }),
        Filter::Array(inner) => {
            let items = match inner {
                Some(inner) => eval(inner, input)?,
                None => Vec::new(),
            };
            Ok(vec![Value::Array(items)])
        },
        Filter::Builtin(builtin) => builtin_value(*builtin, input),
        Filter::Select(cond) => Ok(eval(cond, input)?
            .iter()
            .filter(|v| truthy(v))
            .map(|_| input.clone())
            .collect()),
        Filter::Map(inner) => {
            let mut out = Vec::new();
            for item in iterate(input.clone())? {
                out.extend(eval(inner, &item)?);
            }
            Ok(vec![Value::Array(out)])
        },
    }
}

/// Evaluate `target`, then feed every output through `f`, concatenating.
fn each<F>(target: &Filter, input: &Value, mut f: F) -> Result<Vec<Value>, String>
where
    F: FnMut(Value) -> Result<Vec<Value>, String>,
{
    let mut out = Vec::new();
    for value in eval(target, input)? {
        out.extend(f(value)?);
    }
    Ok(out)
}

fn one(value: Value) -> Vec<Value> {
    vec![value]
}

fn field(value: &Value, name: &str) -> Result<Value, String> {
    match value {
        Value::Object(map) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
        Value::Null => Ok(Value::Null),
        other => Err(format!("cannot index {} with \"{name}\"", type_name(other))),
    }
}

fn index_value(value: &Value, index: i64) -> Result<Value, String> {
    match value {
        Value::Array(items) => Ok(resolve_index(items.len(), index)
            .and_then(|i| items.get(i).cloned())
            .unwrap_or(Value::Null)),
        Value::Null => Ok(Value::Null),
        other => Err(format!("cannot index {} with number", type_name(other))),
    }
}

fn slice(value: &Value, start: Option<i64>, end: Option<i64>) -> Result<Value, String> {
    match value {
        Value::Array(items) => {
            let (from, to) = slice_bounds(items.len(), start, end);
            Ok(Value::Array(items[from..to].to_vec()))
        },
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let (from, to) = slice_bounds(chars.len(), start, end);
            Ok(Value::String(chars[from..to].iter().collect()))
        },
        Value::Null => Ok(Value::Null),
        other => Err(format!("cannot slice {}", type_name(other))),
    }
}

fn iterate(value: Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => Ok(map.into_iter().map(|(_, v)| v).collect()),
        other => Err(format!("cannot iterate over {}", type_name(&other))),
    }
}

/// Resolve a possibly negative index against `len`; `None` when out of range.
fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// Clamp slice bounds into `0..=len` with `from <= to`.
fn slice_bounds(len: usize, start: Option<i64>, end: Option<i64>) -> (usize, usize) {
    let clamp = |bound: i64| -> usize {
        let len_i = i64::try_from(len).unwrap_or(i64::MAX);
        let resolved = if bound < 0 { len_i + bound } else { bound };
        usize::try_from(resolved.clamp(0, len_i)).unwrap_or(0)
    };
    let from = start.map_or(0, clamp);
    let to = end.map_or(len, clamp);
    (from, to.max(from))
}

fn builtin_value(builtin: Builtin, input: &Value) -> Result<Vec<Value>, String> {
    let value = match builtin {
        Builtin::Empty => return Ok(Vec::new()),
        Builtin::Not => Value::Bool(!truthy(input)),
        Builtin::First => index_value(input, 0)?,
        Builtin::Last => index_value(input, -1)?,
        Builtin::Length => length(input)?,
        Builtin::Keys => match input {
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                Value::Array(keys.into_iter().map(|k| Value::String(k.clone())).collect())
            },
            Value::Array(items) => Value::Array((0..items.len()).map(Value::from).collect()),
            other => return Err(format!("{} has no keys", type_name(other))),
        },
    };
    Ok(vec![value])
}

fn length(value: &Value) -> Result<Value, String> {
    Ok(match value {
        Value::Null => Value::from(0),
        Value::Bool(_) => return Err("boolean has no length".into()),
        Value::Number(n) => n.as_i64().map_or_else(
            || {
                n.as_f64()
                    .and_then(|f| Number::from_f64(f.abs()))
                    .map_or(Value::Null, Value::Number)
            },
            |i| Value::from(i.unsigned_abs()),
        ),
        Value::String(s) => Value::from(s.chars().count()),
        Value::Array(items) => Value::from(items.len()),
        Value::Object(map) => Value::from(map.len()),
    })
}

/// `false` and `null` are falsy; everything else is truthy.
pub fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn compare_with(op: CmpOp, left: &Value, right: &Value) -> bool {
    let ord = compare(left, right);
    match op {
        CmpOp::Eq => ord == Ordering::Equal,
        CmpOp::Ne => ord != Ordering::Equal,
        CmpOp::Lt => ord == Ordering::Less,
        CmpOp::Le => ord != Ordering::Greater,
        CmpOp::Gt => ord == Ordering::Greater,
        CmpOp::Ge => ord != Ordering::Less,
    }
}

/// Total order: null < false < true < numbers < strings < arrays < objects.
pub fn compare(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                let ord = compare(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.len().cmp(&b.len())
        },
        (Value::Object(a), Value::Object(b)) => compare_objects(a, b),
        _ => rank(left).cmp(&rank(right)),
    }
}

fn compare_objects(a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    let mut a_keys: Vec<&String> = a.keys().collect();
    let mut b_keys: Vec<&String> = b.keys().collect();
    a_keys.sort();
    b_keys.sort();
    let by_keys = a_keys.cmp(&b_keys);
    if by_keys != Ordering::Equal {
        return by_keys;
    }
    for key in a_keys {
        let ord = compare(&a[key], &b[key]);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

const fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(false) => 1,
        Value::Bool(true) => 2,
        Value::Number(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::query::parser::parse;
    use serde_json::json;

    fn run(expr: &str, input: &Value) -> Vec<Value> {
        eval(&parse(expr).unwrap(), input).unwrap()
    }

    fn run_err(expr: &str, input: &Value) -> String {
        eval(&parse(expr).unwrap(), input).unwrap_err()
    }

    fn staff() -> Value {
        json!({
            "items": [
                {"Id": 1, "DisplayName": "Ada", "Active": true},
                {"Id": 2, "DisplayName": "Bo", "Active": false},
                {"Id": 3, "DisplayName": "Cy", "Active": true}
            ],
            "limit": 3
        })
    }

    mod paths {
        use super::*;

        #[test]
        fn test_field_and_missing_field() {
            assert_eq!(run(".limit", &staff()), vec![json!(3)]);
            assert_eq!(run(".nope", &staff()), vec![Value::Null]);
            assert_eq!(run(".nope.deeper", &staff()), vec![Value::Null]);
        }

        #[test]
        fn test_index_and_negative_index() {
            assert_eq!(run(".items[0].Id", &staff()), vec![json!(1)]);
            assert_eq!(run(".items[-1].Id", &staff()), vec![json!(3)]);
            assert_eq!(run(".items[10]", &staff()), vec![Value::Null]);
        }

        #[test]
        fn test_slices() {
            let input = json!([1, 2, 3, 4, 5]);
            assert_eq!(run(".[1:3]", &input), vec![json!([2, 3])]);
            assert_eq!(run(".[-2:]", &input), vec![json!([4, 5])]);
            assert_eq!(run(".[:10]", &input), vec![input.clone()]);
            assert_eq!(run(".[4:2]", &input), vec![json!([])]);
            assert_eq!(run(".[1:3]", &json!("héllo")), vec![json!("él")]);
        }

        #[test]
        fn test_iterate_arrays_and_objects() {
            assert_eq!(
                run(".items[].DisplayName", &staff()),
                vec![json!("Ada"), json!("Bo"), json!("Cy")]
            );
            assert_eq!(run(".[]", &json!({"a": 1, "b": 2})).len(), 2);
        }

        #[test]
        fn test_optional_suppresses_errors() {
            assert_eq!(run(".limit[]?", &staff()), Vec::<Value>::new());
            assert!(run_err(".limit[]", &staff()).contains("cannot iterate over number"));
            assert!(run_err(".limit.x", &staff()).contains("cannot index number"));
        }
    }

    mod combinators {
        use super::*;

        #[test]
        fn test_pipe_and_comma() {
            assert_eq!(
                run(".items[0] | .Id, .DisplayName", &staff()),
                vec![json!(1), json!("Ada")]
            );
        }

        #[test]
        fn test_select_filters_items() {
            assert_eq!(
                run(".items[] | select(.Active) | .Id", &staff()),
                vec![json!(1), json!(3)]
            );
            assert_eq!(
                run(".items[] | select(.Id >= 2 and .Active) | .DisplayName", &staff()),
                vec![json!("Cy")]
            );
        }

        #[test]
        fn test_map_and_array_construction() {
            assert_eq!(run(".items | map(.Id)", &staff()), vec![json!([1, 2, 3])]);
            assert_eq!(run("[.items[] | .Id]", &staff()), vec![json!([1, 2, 3])]);
            assert_eq!(run("[]", &staff()), vec![json!([])]);
        }

        #[test]
        fn test_or_short_circuits() {
            assert_eq!(run("true or .x.y.z", &json!(5)), vec![json!(true)]);
            assert_eq!(run("null or false", &Value::Null), vec![json!(false)]);
        }
    }

    mod builtins {
        use super::*;

        #[test]
        fn test_length() {
            assert_eq!(run(".items | length", &staff()), vec![json!(3)]);
            assert_eq!(run("length", &json!("héllo")), vec![json!(5)]);
            assert_eq!(run("length", &Value::Null), vec![json!(0)]);
            assert_eq!(run("length", &json!(-4)), vec![json!(4)]);
            assert!(run_err("length", &json!(true)).contains("boolean"));
        }

        #[test]
        fn test_keys_are_sorted() {
            assert_eq!(
                run("keys", &json!({"b": 1, "a": 2})),
                vec![json!(["a", "b"])]
            );
            assert_eq!(run("keys", &json!([7, 8])), vec![json!([0, 1])]);
        }

        #[test]
        fn test_first_last_not_empty() {
            assert_eq!(run(".items | first | .Id", &staff()), vec![json!(1)]);
            assert_eq!(run(".items | last | .Id", &staff()), vec![json!(3)]);
            assert_eq!(run(".limit | not", &staff()), vec![json!(false)]);
            assert_eq!(run("empty", &staff()), Vec::<Value>::new());
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn test_cross_type_order() {
            let ascending = [
                json!(null),
                json!(false),
                json!(true),
                json!(-1),
                json!(2.5),
                json!("a"),
                json!([]),
                json!({}),
            ];
            for pair in ascending.windows(2) {
                assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less, "{pair:?}");
            }
        }

        #[test]
        fn test_numbers_compare_by_value() {
            assert_eq!(run("1 == 1.0", &Value::Null), vec![json!(true)]);
            assert_eq!(run(".Id != 2", &json!({"Id": 2})), vec![json!(false)]);
        }
    }
}
