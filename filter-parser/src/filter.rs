//! FILENAME: filter-parser/src/filter.rs
//! PURPOSE: Structured description of a provider member filter.
//! CONTEXT: A provider advertises the filters available for a dimension
//! (EnumFilters). Each one has a name, ordered argument slots, and
//! optionally a template that composes a provider-native expression from
//! arguments plus a pattern that recognises such an expression and pulls
//! the arguments back out of it.

use crate::FilterError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use wire::{Element, WireError, XmlWriter};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"%(\d+)").expect("placeholder pattern"));

// ============================================================================
// ARGUMENT SLOTS
// ============================================================================

/// Declared type of a filter argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgKind {
    Str,
    Int,
    /// An attribute member.
    Attribute,
    Other(String),
}

impl ArgKind {
    fn from_wire(kind: &str) -> Self {
        match kind {
            "" | "str" => ArgKind::Str,
            "int" => ArgKind::Int,
            "attribute" => ArgKind::Attribute,
            other => ArgKind::Other(other.to_string()),
        }
    }
}

/// One positional argument of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterArg {
    /// Position of the argument; arguments are sent as `<arg id="n">`.
    pub id: usize,
    pub name: String,
    pub kind: ArgKind,
    /// Label shown to a user when asking for the value.
    pub prompt: String,
}

// ============================================================================
// FILTER
// ============================================================================

#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    compose: Option<String>,
    decompose: Option<Regex>,
    args: Vec<FilterArg>,
}

impl Filter {
    pub fn new(name: impl Into<String>) -> Self {
        Filter {
            name: name.into(),
            compose: None,
            decompose: None,
            args: Vec::new(),
        }
    }

    pub fn with_compose(mut self, template: impl Into<String>) -> Self {
        self.compose = Some(template.into());
        self
    }

    pub fn with_decompose(mut self, pattern: &str) -> Result<Self, FilterError> {
        self.decompose = Some(compile(&self.name, pattern)?);
        Ok(self)
    }

    /// Appends an argument slot in the next position.
    pub fn with_arg(mut self, name: impl Into<String>, kind: ArgKind) -> Self {
        let name = name.into();
        self.args.push(FilterArg {
            id: self.args.len(),
            prompt: name.clone(),
            name,
            kind,
        });
        self
    }

    /// Builds a filter from one `<filter>` element of an EnumFilters
    /// response. Empty `compose`/`decompose` attributes mean the filter has
    /// none.
    pub fn from_element(element: &Element) -> Result<Filter, FilterError> {
        let name = element.require_attr("name")?.to_string();
        let compose = element
            .attr("compose")
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let decompose = match element.attr("decompose").filter(|d| !d.is_empty()) {
            Some(pattern) => Some(compile(&name, pattern)?),
            None => None,
        };

        let mut args = element
            .find_all("arg")
            .into_iter()
            .enumerate()
            .map(|(position, arg)| {
                let id = match arg.attr("id") {
                    Some(_) => arg.attr_usize("id")?,
                    None => position,
                };
                Ok(FilterArg {
                    id,
                    name: arg.require_attr("name")?.to_string(),
                    kind: ArgKind::from_wire(arg.attr("type").unwrap_or_default()),
                    prompt: arg.attr("prompt").unwrap_or_default().to_string(),
                })
            })
            .collect::<Result<Vec<_>, WireError>>()?;
        args.sort_by_key(|arg| arg.id);

        Ok(Filter {
            name,
            compose,
            decompose,
            args,
        })
    }

    /// Reads every filter of an EnumFilters response, in response order.
    pub fn parse_catalog(doc: &Element) -> Result<Vec<Filter>, FilterError> {
        let list = doc
            .find("filterList")
            .ok_or_else(|| WireError::MissingElement("filterList".to_string()))?;
        list.find_all("filter")
            .into_iter()
            .map(Filter::from_element)
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compose_template(&self) -> Option<&str> {
        self.compose.as_deref()
    }

    pub fn decompose_pattern(&self) -> Option<&str> {
        self.decompose.as_ref().map(Regex::as_str)
    }

    pub fn args(&self) -> &[FilterArg] {
        &self.args
    }

    /// Fills the compose template, replacing `%0`, `%1`, … with the
    /// arguments at those positions. `None` if the filter has no template
    /// or a placeholder has no argument.
    pub fn compose(&self, args: &[&str]) -> Option<String> {
        let template = self.compose.as_deref()?;
        let mut missing = false;
        let expression = PLACEHOLDER.replace_all(template, |caps: &Captures| {
            match caps[1].parse::<usize>().ok().and_then(|i| args.get(i)) {
                Some(arg) => arg.to_string(),
                None => {
                    missing = true;
                    String::new()
                }
            }
        });
        if missing {
            None
        } else {
            Some(expression.into_owned())
        }
    }

    /// Recognises an expression built by this filter and returns the
    /// arguments it was built from, in capture-group order.
    ///
    /// Every capture is trimmed of surrounding whitespace, so a greedy
    /// pattern such as `\s*(.+)\s*` yields the bare member name. The
    /// flip side: an argument whose value really starts or ends with spaces
    /// comes back without them and does not round-trip through `compose`.
    /// Unmatched optional groups come back as empty strings.
    pub fn decompose(&self, expression: &str) -> Option<ResolvedFilter> {
        let caps = self.decompose.as_ref()?.captures(expression)?;
        let args = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().trim().to_string()).unwrap_or_default())
            .collect();
        Some(ResolvedFilter {
            name: self.name.clone(),
            args,
        })
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn compile(filter: &str, pattern: &str) -> Result<Regex, FilterError> {
    Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
        filter: filter.to_string(),
        source,
    })
}

// ============================================================================
// RESOLVED FILTER
// ============================================================================

/// A filter name with its arguments in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFilter {
    pub name: String,
    pub args: Vec<String>,
}

impl ResolvedFilter {
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResolvedFilter {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Writes `<filter name="..."><arg id="0">...</arg>...</filter>`.
    /// Argument ids are positional.
    pub fn write_xml(&self, w: &mut XmlWriter) -> Result<(), WireError> {
        w.element("filter", &[("name", self.name.as_str())], |w| {
            for (i, arg) in self.args.iter().enumerate() {
                let id = i.to_string();
                w.text_element("arg", &[("id", id.as_str())], arg)?;
            }
            Ok(())
        })
    }
}
