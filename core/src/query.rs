//! Query-filter composition for the One API.
//!
//! # Design
//! Every filter, sort and pagination directive is a `Predicate` variant and
//! knows how to render itself as one fragment of the raw query string. A
//! `CompositeQuery` groups predicates in insertion order and converts back
//! into a `Predicate`, so groups nest freely and flatten when serialized.
//!
//! Construction never fails. All validation happens in `serialize`, which
//! is the only call the transport layer makes:
//!
//! ```
//! use onering_core::query::{merge, serialize, Operator, Predicate, SortOrder};
//!
//! let query = merge([
//!     Predicate::binary("race", Operator::Equal, ["Hobbit", "Elf"]),
//!     Predicate::not_exist("death"),
//!     Predicate::sort("name", SortOrder::Ascending),
//!     Predicate::limit(10),
//! ]);
//! let raw = serialize(&query.into()).unwrap();
//! assert_eq!(raw, "race=Hobbit,Elf&!death&sort=name:asc&limit=10");
//! ```
//!
//! Values are encoded with `application/x-www-form-urlencoded` rules, so a
//! space becomes `+`. Field names and the comma joining an OR-list are
//! written as-is; the remote side splits on that comma.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;

use crate::error::QueryError;

/// Comparison applied by a `Predicate::Binary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum Operator {
    Equal = 0,
    NotEqual = 1,
    LessThan = 2,
    GreaterThan = 3,
    LessThanOrEqual = 4,
    GreaterThanOrEqual = 5,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessThan,
        Operator::GreaterThan,
        Operator::LessThanOrEqual,
        Operator::GreaterThanOrEqual,
    ];

    /// Wire token placed between the field name and its values.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThanOrEqual => ">=",
        }
    }

    /// Only (in)equality takes an OR-list; the API cannot chain inequalities.
    pub fn accepts_many(self) -> bool {
        matches!(self, Operator::Equal | Operator::NotEqual)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.token() == s)
            .ok_or_else(|| QueryError::InvalidOperator(s.to_string()))
    }
}

impl TryFrom<u8> for Operator {
    type Error = QueryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Operator::ALL
            .into_iter()
            .find(|op| *op as u8 == code)
            .ok_or_else(|| QueryError::InvalidOperator(code.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = QueryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.token().to_string()
    }
}

/// Direction of a `Predicate::Sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum SortOrder {
    Ascending = 0,
    Descending = 1,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Ascending, SortOrder::Descending];

    pub fn token(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.token() == s)
            .ok_or_else(|| QueryError::InvalidSortOrder(s.to_string()))
    }
}

impl TryFrom<u8> for SortOrder {
    type Error = QueryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        SortOrder::ALL
            .into_iter()
            .find(|order| *order as u8 == code)
            .ok_or_else(|| QueryError::InvalidSortOrder(code.to_string()))
    }
}

impl TryFrom<String> for SortOrder {
    type Error = QueryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        order.token().to_string()
    }
}

/// Which pagination parameter a `Predicate::Pagination` sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationKey {
    Limit,
    Page,
    Offset,
}

impl PaginationKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PaginationKey::Limit => "limit",
            PaginationKey::Page => "page",
            PaginationKey::Offset => "offset",
        }
    }
}

/// A single filter, sort or pagination directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// `field<op>v1,v2,...`
    Binary {
        field: String,
        operator: Operator,
        values: Vec<String>,
    },
    /// `field`
    Exist { field: String },
    /// `!field`
    NotExist { field: String },
    /// `sort=field:asc|desc`
    Sort { field: String, order: SortOrder },
    /// `limit=n`, `page=n` or `offset=n`
    Pagination { key: PaginationKey, value: u64 },
    /// A nested group, serialized in place.
    Composite(CompositeQuery),
}

impl Predicate {
    /// Compare `field` against one or more values. Several values form an
    /// OR-list, which only `Equal` and `NotEqual` accept.
    pub fn binary<F, I, V>(field: F, operator: Operator, values: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Predicate::Binary {
            field: field.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equal(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::binary(field, Operator::Equal, [value])
    }

    pub fn not_equal(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::binary(field, Operator::NotEqual, [value])
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::binary(field, Operator::LessThan, [value])
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::binary(field, Operator::GreaterThan, [value])
    }

    pub fn less_or_equal(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::binary(field, Operator::LessThanOrEqual, [value])
    }

    pub fn greater_or_equal(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::binary(field, Operator::GreaterThanOrEqual, [value])
    }

    /// Select only documents that carry `field`.
    pub fn exist(field: impl Into<String>) -> Self {
        Predicate::Exist {
            field: field.into(),
        }
    }

    /// Select only documents that lack `field`.
    pub fn not_exist(field: impl Into<String>) -> Self {
        Predicate::NotExist {
            field: field.into(),
        }
    }

    pub fn sort(field: impl Into<String>, order: SortOrder) -> Self {
        Predicate::Sort {
            field: field.into(),
            order,
        }
    }

    pub fn limit(value: u64) -> Self {
        Predicate::Pagination {
            key: PaginationKey::Limit,
            value,
        }
    }

    pub fn page(value: u64) -> Self {
        Predicate::Pagination {
            key: PaginationKey::Page,
            value,
        }
    }

    pub fn offset(value: u64) -> Self {
        Predicate::Pagination {
            key: PaginationKey::Offset,
            value,
        }
    }

    /// Render this predicate as a raw query-string fragment.
    pub fn to_query(&self) -> Result<String, QueryError> {
        match self {
            Predicate::Binary {
                field,
                operator,
                values,
            } => binary_fragment(field, *operator, values),
            Predicate::Exist { field } => Ok(field.clone()),
            Predicate::NotExist { field } => Ok(format!("!{field}")),
            Predicate::Sort { field, order } => Ok(format!("sort={field}:{}", order.token())),
            Predicate::Pagination { key, value } => Ok(format!("{}={value}", key.as_str())),
            Predicate::Composite(query) => query.to_query(),
        }
    }
}

fn binary_fragment(field: &str, operator: Operator, values: &[String]) -> Result<String, QueryError> {
    let (first, rest) = values.split_first().ok_or_else(|| QueryError::EmptyValueList {
        field: field.to_string(),
    })?;
    if !rest.is_empty() && !operator.accepts_many() {
        return Err(QueryError::MultiValueOnInequality {
            field: field.to_string(),
            operator,
        });
    }

    let mut out = String::with_capacity(field.len() + 2 + values.iter().map(|v| v.len() + 1).sum::<usize>());
    out.push_str(field);
    out.push_str(operator.token());
    out.extend(byte_serialize(first.as_bytes()));
    for value in rest {
        out.push(',');
        out.extend(byte_serialize(value.as_bytes()));
    }
    Ok(out)
}

/// An ordered group of predicates that serializes as one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeQuery {
    predicates: Vec<Predicate>,
}

impl CompositeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate, keeping insertion order.
    pub fn with(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Serialize members in order and join the non-empty fragments with `&`.
    /// The first failing member aborts the whole query.
    pub fn to_query(&self) -> Result<String, QueryError> {
        let mut out = String::new();
        for predicate in &self.predicates {
            let fragment = predicate.to_query()?;
            if fragment.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&fragment);
        }
        Ok(out)
    }
}

impl From<CompositeQuery> for Predicate {
    fn from(query: CompositeQuery) -> Self {
        Predicate::Composite(query)
    }
}

impl<P: Into<Predicate>> FromIterator<P> for CompositeQuery {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Combine predicates, composites included, into a single group.
pub fn merge<I>(predicates: I) -> CompositeQuery
where
    I: IntoIterator,
    I::Item: Into<Predicate>,
{
    predicates.into_iter().collect()
}

/// Produce the raw query string for `predicate`. An empty result means the
/// request carries no query component at all.
pub fn serialize(predicate: &Predicate) -> Result<String, QueryError> {
    predicate.to_query()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Undo form-urlencoding the way a server reading the raw query would.
    fn decoded(raw: &str) -> String {
        percent_encoding::percent_decode_str(&raw.replace('+', " "))
            .decode_utf8()
            .unwrap()
            .into_owned()
    }

    fn query(predicate: Predicate) -> String {
        decoded(&serialize(&predicate).unwrap())
    }

    #[test]
    fn operator_tokens() {
        let tokens: Vec<&str> = Operator::ALL.iter().map(|op| op.token()).collect();
        assert_eq!(tokens, vec!["=", "!=", "<", ">", "<=", ">="]);
    }

    #[test]
    fn operator_parses_every_token_back() {
        for op in Operator::ALL {
            assert_eq!(op.token().parse::<Operator>().unwrap(), op);
            assert_eq!(Operator::try_from(op as u8).unwrap(), op);
        }
    }

    #[test]
    fn unknown_operator_token_is_rejected() {
        let err = "=~".parse::<Operator>().unwrap_err();
        assert_eq!(err, QueryError::InvalidOperator("=~".to_string()));
    }

    #[test]
    fn out_of_range_operator_code_is_rejected() {
        let err = Operator::try_from(6).unwrap_err();
        assert!(matches!(err, QueryError::InvalidOperator(code) if code == "6"));
    }

    #[test]
    fn sort_order_tokens_and_codes() {
        assert_eq!(SortOrder::Ascending.token(), "asc");
        assert_eq!(SortOrder::Descending.token(), "desc");
        assert_eq!(SortOrder::try_from(1).unwrap(), SortOrder::Descending);
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
    }

    #[test]
    fn invalid_sort_order_is_rejected() {
        assert!(matches!(
            "up".parse::<SortOrder>(),
            Err(QueryError::InvalidSortOrder(_))
        ));
        assert!(matches!(
            SortOrder::try_from(2),
            Err(QueryError::InvalidSortOrder(_))
        ));
    }

    #[test]
    fn equality_with_single_value() {
        assert_eq!(query(Predicate::equal("name", "Elrond")), "name=Elrond");
        assert_eq!(query(Predicate::not_equal("name", "Glorfindel")), "name!=Glorfindel");
    }

    #[test]
    fn equality_with_many_values_keeps_order() {
        let p = Predicate::binary(
            "name",
            Operator::Equal,
            ["The Two Towers", "The Battle of the Five Armies"],
        );
        assert_eq!(query(p), "name=The Two Towers,The Battle of the Five Armies");

        let p = Predicate::binary(
            "name",
            Operator::NotEqual,
            ["The Fellowship of the Ring", "The Hobbit"],
        );
        assert_eq!(query(p), "name!=The Fellowship of the Ring,The Hobbit");
    }

    #[test]
    fn values_are_encoded_but_separator_is_not() {
        let raw = serialize(&Predicate::binary("name", Operator::Equal, ["a,b", "c&d"])).unwrap();
        assert_eq!(raw, "name=a%2Cb,c%26d");
    }

    #[test]
    fn spaces_are_encoded_as_plus() {
        let raw = serialize(&Predicate::equal("name", "Tom Bombadil")).unwrap();
        assert_eq!(raw, "name=Tom+Bombadil");
    }

    #[test]
    fn field_names_are_not_encoded() {
        let raw = serialize(&Predicate::equal("a b", "x")).unwrap();
        assert_eq!(raw, "a b=x");
    }

    #[test]
    fn regex_value_survives_decoding() {
        assert_eq!(query(Predicate::equal("name", "/foot/i")), "name=/foot/i");
    }

    #[test]
    fn inequalities_with_one_value() {
        assert_eq!(query(Predicate::less_than("budgetInMillions", "100")), "budgetInMillions<100");
        assert_eq!(query(Predicate::less_or_equal("academyAwardWins", "0")), "academyAwardWins<=0");
        assert_eq!(query(Predicate::greater_than("runtimeInMinutes", "160")), "runtimeInMinutes>160");
        assert_eq!(
            query(Predicate::greater_or_equal("budgetInMillions", "200")),
            "budgetInMillions>=200"
        );
    }

    #[test]
    fn inequalities_reject_value_lists() {
        for op in Operator::ALL.into_iter().filter(|op| !op.accepts_many()) {
            let err = serialize(&Predicate::binary("budgetInMillions", op, ["100", "200"])).unwrap_err();
            assert_eq!(
                err,
                QueryError::MultiValueOnInequality {
                    field: "budgetInMillions".to_string(),
                    operator: op,
                }
            );
            assert!(err.to_string().contains(op.token()));
        }
    }

    #[test]
    fn empty_value_list_is_rejected() {
        let p = Predicate::binary("name", Operator::Equal, Vec::<String>::new());
        assert_eq!(
            serialize(&p).unwrap_err(),
            QueryError::EmptyValueList {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn existence() {
        assert_eq!(query(Predicate::exist("wikiURL")), "wikiURL");
        assert_eq!(query(Predicate::not_exist("hair")), "!hair");
    }

    #[test]
    fn sorting() {
        assert_eq!(query(Predicate::sort("name", SortOrder::Ascending)), "sort=name:asc");
        assert_eq!(query(Predicate::sort("hair", SortOrder::Descending)), "sort=hair:desc");
    }

    #[test]
    fn pagination() {
        assert_eq!(query(Predicate::limit(2)), "limit=2");
        assert_eq!(query(Predicate::page(7)), "page=7");
        assert_eq!(query(Predicate::offset(31)), "offset=31");
        assert_eq!(query(Predicate::limit(u64::MAX)), format!("limit={}", u64::MAX));
    }

    #[test]
    fn empty_merge_is_empty_query() {
        assert_eq!(serialize(&merge(Vec::<Predicate>::new()).into()).unwrap(), "");
        assert!(CompositeQuery::new().to_query().unwrap().is_empty());
    }

    #[test]
    fn merge_joins_in_argument_order() {
        let q = merge([
            Predicate::exist("wikiURL"),
            Predicate::not_exist("hair"),
            Predicate::limit(5),
        ]);
        assert_eq!(q.len(), 3);
        assert_eq!(serialize(&q.into()).unwrap(), "wikiURL&!hair&limit=5");
    }

    #[test]
    fn nested_composites_flatten_in_place() {
        let inner = merge([Predicate::equal("race", "Hobbit"), Predicate::page(2)]);
        let outer = CompositeQuery::new()
            .with(Predicate::exist("name"))
            .with(inner.clone())
            .with(CompositeQuery::new())
            .with(Predicate::sort("name", SortOrder::Descending));
        assert_eq!(outer.len(), 4);
        assert_eq!(outer.predicates()[0], Predicate::exist("name"));
        assert_eq!(outer.predicates()[1], Predicate::Composite(inner.clone()));
        assert_eq!(outer.predicates()[2], Predicate::Composite(CompositeQuery::new()));
        assert_eq!(
            outer.to_query().unwrap(),
            "name&race=Hobbit&page=2&sort=name:desc"
        );
    }

    #[test]
    fn first_error_aborts_composite() {
        let q = merge([
            Predicate::exist("name"),
            Predicate::binary("runtimeInMinutes", Operator::GreaterThan, ["1", "2"]),
            Predicate::binary("name", Operator::Equal, Vec::<String>::new()),
        ]);
        assert!(matches!(
            q.to_query(),
            Err(QueryError::MultiValueOnInequality { .. })
        ));
    }

    #[test]
    fn predicates_deserialize_from_tagged_json() {
        let p: Predicate = serde_json::from_str(
            r#"{"kind":"composite","predicates":[
                {"kind":"binary","field":"race","operator":"!=","values":["Orc"]},
                {"kind":"sort","field":"name","order":"desc"},
                {"kind":"pagination","key":"offset","value":3}
            ]}"#,
        )
        .unwrap();
        assert_eq!(p.to_query().unwrap(), "race!=Orc&sort=name:desc&offset=3");
    }

    #[test]
    fn deserializing_unknown_operator_fails() {
        let err = serde_json::from_str::<Predicate>(
            r#"{"kind":"binary","field":"race","operator":"~","values":["Orc"]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid compare operator"));
    }

    #[test]
    fn deserializing_unknown_sort_order_fails() {
        let err = serde_json::from_str::<Predicate>(r#"{"kind":"sort","field":"name","order":"sideways"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid sort order"));
        assert_eq!(
            SortOrder::try_from("sideways".to_string()).unwrap_err(),
            QueryError::InvalidSortOrder("sideways".to_string())
        );
    }

    #[test]
    fn query_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predicate>();
        assert_send_sync::<CompositeQuery>();
    }
}
