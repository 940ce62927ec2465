//! Operation descriptors: request-line parsing, argument binding and URL resolution.

use std::{fmt, str::FromStr};

use url::Url;

use crate::errors::ContractError;

/// HTTP method of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Param(String),
}

/// One path segment, query key or query value, split into literal text and
/// `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Template(Vec<Piece>);

impl Template {
    fn parse(raw: &str, line: &str) -> Result<Self, ContractError> {
        let malformed = |reason| ContractError::MalformedRoute {
            line: line.to_string(),
            reason,
        };

        let mut pieces = Vec::new();
        let mut rest = raw;
        while !rest.is_empty() {
            match rest.find(|c: char| c == '{' || c == '}') {
                None => {
                    pieces.push(Piece::Literal(rest.to_string()));
                    break;
                }
                Some(idx) if rest[idx..].starts_with('}') => {
                    return Err(malformed("unbalanced '}'"));
                }
                Some(idx) => {
                    if idx > 0 {
                        pieces.push(Piece::Literal(rest[..idx].to_string()));
                    }
                    let after = &rest[idx + 1..];
                    let close = after.find('}').ok_or_else(|| malformed("unclosed '{'"))?;
                    let name = &after[..close];
                    if name.is_empty() {
                        return Err(malformed("empty placeholder"));
                    }
                    if name.contains('{') {
                        return Err(malformed("nested '{'"));
                    }
                    pieces.push(Piece::Param(name.to_string()));
                    rest = &after[close + 1..];
                }
            }
        }
        Ok(Template(pieces))
    }

    fn params(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|p| match p {
            Piece::Param(name) => Some(name.as_str()),
            Piece::Literal(_) => None,
        })
    }

    /// Expands the template. Every placeholder is known to be bound.
    fn expand(&self, params: &Params) -> String {
        self.0
            .iter()
            .map(|p| match p {
                Piece::Literal(text) => text.as_str(),
                Piece::Param(name) => params.get(name).unwrap_or_default(),
            })
            .collect()
    }
}

/// Arguments bound to a route's placeholders, plus optional extra query pairs
/// appended after the template's own query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: Vec<(String, String)>,
    query: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to the placeholder `name`. Binding a name twice keeps the last value.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    /// Appends an extra query pair that is not part of the route template.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Static description of one remote call, parsed from a request line such as
/// `GET /repos/{owner}/{repo}/contributors`.
///
/// The path may contain `{name}` placeholders inside segments, and the query
/// string may contain them in keys or values. A route is immutable once parsed.
///
/// Literal text in the line is written unencoded: it is percent-encoded
/// together with bound values when the invocation is resolved, so `%20` in a
/// template reaches the server as `%2520`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: String,
    method: Method,
    line: String,
    segments: Vec<Template>,
    query: Vec<(Template, Option<Template>)>,
    params: Vec<String>,
}

impl Route {
    /// Parses `line` into a route. `name` is the method key used in logs and
    /// passed to error decoders.
    pub fn parse(name: impl Into<String>, line: &str) -> Result<Self, ContractError> {
        let malformed = |reason| ContractError::MalformedRoute {
            line: line.to_string(),
            reason,
        };

        let (method, target) = line
            .trim()
            .split_once(' ')
            .ok_or_else(|| malformed("expected `METHOD /path`"))?;
        let method = method
            .parse::<Method>()
            .map_err(|_| malformed("unknown HTTP method"))?;
        let target = target.trim();
        let path = target
            .strip_prefix('/')
            .ok_or_else(|| malformed("path must start with '/'"))?;

        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let segments = path
            .split('/')
            .map(|seg| Template::parse(seg, line))
            .collect::<Result<Vec<_>, _>>()?;

        let query = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter(|pair| !pair.is_empty())
            .map(|pair| -> Result<_, ContractError> {
                match pair.split_once('=') {
                    Some((k, v)) => Ok((Template::parse(k, line)?, Some(Template::parse(v, line)?))),
                    None => Ok((Template::parse(pair, line)?, None)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut params: Vec<String> = Vec::new();
        let declared = segments
            .iter()
            .chain(query.iter().flat_map(|(k, v)| std::iter::once(k).chain(v.as_ref())));
        for template in declared {
            for name in template.params() {
                if !params.iter().any(|p| p == name) {
                    params.push(name.to_string());
                }
            }
        }

        Ok(Self {
            name: name.into(),
            method,
            line: format!("{} {}", method, target),
            segments,
            query,
            params,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Placeholder names in first-seen order, without duplicates.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Binds arguments to this route. Every placeholder needs an argument and
    /// every argument needs a placeholder.
    pub fn bind(&self, params: &Params) -> Result<Invocation, ContractError> {
        if let Some(missing) = self.params.iter().find(|p| params.get(p).is_none()) {
            return Err(ContractError::MissingArgument {
                route: self.name.clone(),
                name: missing.clone(),
            });
        }
        if let Some((unexpected, _)) = params
            .values
            .iter()
            .find(|(n, _)| !self.params.contains(n))
        {
            return Err(ContractError::UnexpectedArgument {
                route: self.name.clone(),
                name: unexpected.clone(),
            });
        }

        let path_segments = self.segments.iter().map(|t| t.expand(params)).collect();
        let query = self
            .query
            .iter()
            .map(|(k, v)| (k.expand(params), v.as_ref().map(|v| v.expand(params))))
            .chain(params.query.iter().map(|(k, v)| (k.clone(), Some(v.clone()))))
            .collect();

        Ok(Invocation {
            method: self.method,
            method_key: self.name.clone(),
            path_segments,
            query,
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// A route bound to concrete argument values. Created per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    method: Method,
    method_key: String,
    path_segments: Vec<String>,
    query: Vec<(String, Option<String>)>,
}

impl Invocation {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn method_key(&self) -> &str {
        &self.method_key
    }

    /// Resolves this invocation against `base`, keeping any path prefix the
    /// base already has. Path values are encoded as single segments.
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty();
            for segment in &self.path_segments {
                segments.push(segment);
            }
        }
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                match value {
                    Some(value) => pairs.append_pair(key, value),
                    None => pairs.append_key_only(key),
                };
            }
        }
        Ok(url)
    }
}

/// A [`Route`] paired with the shape its success body decodes into.
pub struct Operation<R> {
    route: Route,
    empty: Option<fn() -> R>,
}

impl<R> Operation<R> {
    pub fn new(route: Route) -> Self {
        Self { route, empty: None }
    }

    /// Parses a request line directly into a typed operation.
    pub fn parse(name: impl Into<String>, line: &str) -> Result<Self, ContractError> {
        Route::parse(name, line).map(Self::new)
    }

    /// Decodes a success response with no body (such as `204 No Content`)
    /// as `R::default()` instead of failing.
    pub fn default_on_empty(mut self) -> Self
    where
        R: Default,
    {
        self.empty = Some(R::default as fn() -> R);
        self
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Value for an empty success body, if this operation has one.
    pub fn empty_value(&self) -> Option<R> {
        self.empty.map(|empty| empty())
    }
}

impl<R> Clone for Operation<R> {
    fn clone(&self) -> Self {
        Self {
            route: self.route.clone(),
            empty: self.empty,
        }
    }
}

impl<R> fmt::Debug for Operation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("route", &self.route)
            .field("shape", &std::any::type_name::<R>())
            .field("default_on_empty", &self.empty.is_some())
            .finish()
    }
}
