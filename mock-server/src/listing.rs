//! Server-side reading of the One API query grammar.
//!
//! A raw query is a `&`-joined list of fragments:
//!
//! - `field=a,b` / `field!=a,b` - match (or exclude) any of the listed values
//! - `field<n`, `field>n`, `field<=n`, `field>=n` - numeric comparison
//! - `field` / `!field` - field present / absent
//! - `sort=field:asc|desc`
//! - `limit=n`, `page=n`, `offset=n`
//!
//! Values are form-urlencoded; the comma between them is not.

use std::cmp::Ordering;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LIMIT: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
    Compare { field: String, op: Op, values: Vec<String> },
    Exists(String),
    Missing(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Listing {
    pub clauses: Vec<Clause>,
    pub sort: Option<(String, bool)>,
    pub limit: Option<u64>,
    pub page: Option<u64>,
    pub offset: Option<u64>,
}

/// Response envelope shared by every list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub docs: Vec<Value>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub page: u64,
    pub pages: u64,
}

fn decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

fn number(key: &str, raw: &str) -> Result<u64, String> {
    raw.parse()
        .map_err(|_| format!("{key} must be a non-negative integer, got {raw:?}"))
}

fn parse_clause(fragment: &str) -> Result<Clause, String> {
    let is_op = |c: char| matches!(c, '!' | '<' | '>' | '=');

    if let Some(field) = fragment.strip_prefix('!') {
        if !field.contains(is_op) {
            return Ok(Clause::Missing(decode(field)));
        }
    }

    let Some(at) = fragment.find(is_op) else {
        return Ok(Clause::Exists(decode(fragment)));
    };
    let (field, rest) = fragment.split_at(at);
    let (op, raw_values) = [
        ("!=", Op::Ne),
        ("<=", Op::Le),
        (">=", Op::Ge),
        ("<", Op::Lt),
        (">", Op::Gt),
        ("=", Op::Eq),
    ]
    .into_iter()
    .find_map(|(token, op)| rest.strip_prefix(token).map(|values| (op, values)))
    .ok_or_else(|| format!("unrecognised filter {fragment:?}"))?;

    if field.is_empty() {
        return Err(format!("filter {fragment:?} has no field"));
    }
    let values: Vec<String> = raw_values.split(',').map(decode).collect();
    if values.len() > 1 && !matches!(op, Op::Eq | Op::Ne) {
        return Err(format!("cannot chain values in {fragment:?}"));
    }

    Ok(Clause::Compare {
        field: decode(field),
        op,
        values,
    })
}

fn value_equals(value: &Value, wanted: &str) -> bool {
    match value {
        Value::String(s) => s == wanted,
        Value::Number(n) => match (n.as_f64(), wanted.parse::<f64>()) {
            (Some(n), Ok(w)) => n == w,
            _ => false,
        },
        Value::Bool(b) => b.to_string() == wanted,
        _ => false,
    }
}

impl Clause {
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Clause::Exists(field) => doc.get(field).is_some_and(|v| !v.is_null()),
            Clause::Missing(field) => !doc.get(field).is_some_and(|v| !v.is_null()),
            Clause::Compare { field, op, values } => {
                let value = doc.get(field);
                match op {
                    Op::Eq => value.is_some_and(|v| values.iter().any(|w| value_equals(v, w))),
                    Op::Ne => !value.is_some_and(|v| values.iter().any(|w| value_equals(v, w))),
                    _ => {
                        let lhs = value.and_then(Value::as_f64);
                        let rhs = values.first().and_then(|w| w.parse::<f64>().ok());
                        let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
                            return false;
                        };
                        match op {
                            Op::Lt => lhs < rhs,
                            Op::Gt => lhs > rhs,
                            Op::Le => lhs <= rhs,
                            _ => lhs >= rhs,
                        }
                    }
                }
            }
        }
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

impl Listing {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut listing = Listing::default();
        for fragment in raw.split('&').filter(|f| !f.is_empty()) {
            if let Some(sort) = fragment.strip_prefix("sort=") {
                let (field, order) = sort
                    .split_once(':')
                    .ok_or_else(|| format!("sort needs field:order, got {sort:?}"))?;
                let descending = match order {
                    "asc" => false,
                    "desc" => true,
                    other => return Err(format!("unknown sort order {other:?}")),
                };
                listing.sort = Some((decode(field), descending));
            } else if let Some(raw) = fragment.strip_prefix("limit=") {
                listing.limit = Some(number("limit", raw)?);
            } else if let Some(raw) = fragment.strip_prefix("page=") {
                listing.page = Some(number("page", raw)?);
            } else if let Some(raw) = fragment.strip_prefix("offset=") {
                listing.offset = Some(number("offset", raw)?);
            } else {
                listing.clauses.push(parse_clause(fragment)?);
            }
        }
        Ok(listing)
    }

    /// Filter, sort and paginate `docs` into a response envelope.
    pub fn apply(&self, docs: Vec<Value>) -> Envelope {
        let mut docs: Vec<Value> = docs
            .into_iter()
            .filter(|doc| self.clauses.iter().all(|clause| clause.matches(doc)))
            .collect();

        if let Some((field, descending)) = &self.sort {
            docs.sort_by(|a, b| {
                let ord = compare(a.get(field), b.get(field));
                if *descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        let total = docs.len() as u64;
        let limit = self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
        let (offset, page) = match self.offset {
            Some(offset) => (offset, offset / limit + 1),
            None => {
                let page = self.page.unwrap_or(1).max(1);
                ((page - 1).saturating_mul(limit), page)
            }
        };

        let docs = docs
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Envelope {
            docs,
            total,
            limit,
            offset,
            page,
            pages: total.div_ceil(limit),
        }
    }
}
