//! FILENAME: filter-parser/src/dialect.rs
//! PURPOSE: Turns a human-authored filter expression into a filter name and
//! its arguments, following the conventions of each provider family.
//! CONTEXT: The provider kind selects a default filter and, optionally, a
//! static grammar that is tried before the filter catalog.
//!
//! HFM GRAMMAR (tried in order, input trimmed):
//!   Name(arg)              --> (Name, [arg])
//!   {Member.[Filter]}      --> ([Filter], [Member])
//!   {[Filter]}             --> ([Filter], [dimension])
//!   {Filter}               --> (Filter, [dimension])
//!   word                   --> ([Hierarchy], [root])
//!
//! ESSBASE / UNKNOWN: no static grammar. The catalog's decompose patterns
//! are the only way in, since `DESCENDANTS([IS])` would otherwise read as
//! a `Name(arg)` call.
//!
//! Anything the static grammar does not recognise is matched against the
//! catalog; the first filter whose decompose pattern matches wins.

use crate::filter::{Filter, ResolvedFilter};
use crate::FilterError;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use wire::ProviderKind;

/// Static grammar of a provider family: `(dimension, trimmed expression)`.
type StaticGrammar = fn(&str, &str) -> Option<ResolvedFilter>;

static CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^(]+)\(([^)]+)\)$").expect("call pattern"));
static MEMBER_FILTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{(?:([\w\s]+)\.)?(\[[\w\s]+\])\}$").expect("member filter pattern"));
static MEMBER_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{([\w\s]+)\}$").expect("member list pattern"));
static BARE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").expect("bare word pattern"));

/// The filter used when no expression is given.
///
/// - HFM: the whole hierarchy from the sentinel `root` member.
/// - Essbase and unknown providers: the whole hierarchy below the
///   dimension itself.
pub fn default_filter(provider: ProviderKind, dimension: &str) -> ResolvedFilter {
    match provider {
        ProviderKind::Hfm => ResolvedFilter::new("[Hierarchy]", ["root"]),
        ProviderKind::Essbase | ProviderKind::Unknown => ResolvedFilter::new("Hierarchy", [dimension]),
    }
}

fn static_grammar(provider: ProviderKind) -> Option<StaticGrammar> {
    match provider {
        ProviderKind::Hfm => Some(resolve_hfm),
        ProviderKind::Essbase | ProviderKind::Unknown => None,
    }
}

/// Resolves a filter expression for `dimension`.
///
/// A missing or blank expression yields the provider default. `catalog`
/// is the list of filters the provider advertises for the dimension; it is
/// only consulted when the static grammar (if any) does not match.
pub fn resolve_filter(
    provider: ProviderKind,
    dimension: &str,
    expression: Option<&str>,
    catalog: &[Filter],
) -> Result<ResolvedFilter, FilterError> {
    let literal = match expression {
        Some(e) if !e.trim().is_empty() => e,
        _ => return Ok(default_filter(provider, dimension)),
    };
    let trimmed = literal.trim();

    if let Some(resolved) = static_grammar(provider).and_then(|grammar| grammar(dimension, trimmed)) {
        return Ok(resolved);
    }

    match_catalog(trimmed, catalog)
        .ok_or_else(|| FilterError::UnrecognisedFilterExpression(literal.to_string()))
}

/// First catalog filter, in catalog order, whose decompose pattern matches.
pub fn match_catalog(expression: &str, catalog: &[Filter]) -> Option<ResolvedFilter> {
    let resolved = catalog.iter().find_map(|filter| filter.decompose(expression))?;
    debug!("Filter expression '{}' matched catalog filter '{}'", expression, resolved.name);
    Some(resolved)
}

fn resolve_hfm(dimension: &str, expression: &str) -> Option<ResolvedFilter> {
    if let Some(caps) = CALL.captures(expression) {
        return Some(ResolvedFilter::new(&caps[1], [&caps[2]]));
    }
    if let Some(caps) = MEMBER_FILTER.captures(expression) {
        let member = caps.get(1).map_or(dimension, |m| m.as_str());
        return Some(ResolvedFilter::new(&caps[2], [member]));
    }
    if let Some(caps) = MEMBER_LIST.captures(expression) {
        return Some(ResolvedFilter::new(&caps[1], [dimension]));
    }
    if BARE_WORD.is_match(expression) {
        return Some(default_filter(ProviderKind::Hfm, dimension));
    }
    None
}
