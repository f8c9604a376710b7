use std::fmt;

use super::shapes::Shape;
use super::types::NormalizedName;

/// HTTP methods that produce bindings. GET is a query, the rest are mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    /// Match a path item key such as `get`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_lower() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }

    /// The PascalCase verb embedded in derived identifiers.
    pub fn verb(&self) -> &'static str {
        match self {
            HttpMethod::Get => "Get",
            HttpMethod::Post => "Post",
            HttpMethod::Put => "Put",
            HttpMethod::Delete => "Delete",
            HttpMethod::Patch => "Patch",
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized operation: one (path, method) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    /// Path parameters first in template order, then query parameters as declared.
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Responses in declared order.
    pub responses: Vec<Response>,
    /// Index into `responses` of the first declared 2xx response.
    pub primary_success: Option<usize>,
    /// Any required parameter, or any request body.
    pub has_required_input: bool,
    /// Document location, e.g. `paths./pets.get`.
    pub source: String,
}

impl Operation {
    /// `METHOD /path`, the key used for aliases and diagnostics.
    pub fn route_key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn success(&self) -> Option<&Response> {
        self.primary_success.map(|i| &self.responses[i])
    }

    pub fn path_params(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
    }

    pub fn query_params(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Query)
    }
}

/// Where a bound parameter is sent. Header and cookie parameters are dropped
/// during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: NormalizedName,
    /// Wire name as declared, used as the key in generated argument objects.
    pub original_name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub shape: Shape,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub shape: Shape,
    pub content_type: String,
    pub required: bool,
    pub description: Option<String>,
}

/// A declared response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Code(u16),
    /// A class such as `2XX`, holding the leading digit.
    Range(u8),
    Default,
}

impl StatusCode {
    /// Parse a responses-map key. Returns `None` for anything that is neither
    /// a three-digit code, a `nXX` range nor `default`.
    pub fn parse(key: &str) -> Option<Self> {
        if key == "default" {
            return Some(StatusCode::Default);
        }
        let bytes = key.as_bytes();
        if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
            return None;
        }
        if key[1..].eq_ignore_ascii_case("xx") {
            return Some(StatusCode::Range(bytes[0] - b'0'));
        }
        key.parse::<u16>().ok().map(StatusCode::Code)
    }

    pub fn is_success(&self) -> bool {
        match self {
            StatusCode::Code(c) => (200..300).contains(c),
            StatusCode::Range(class) => *class == 2,
            StatusCode::Default => false,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Code(c) => write!(f, "{c}"),
            StatusCode::Range(class) => write!(f, "{class}XX"),
            StatusCode::Default => f.write_str("default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    /// `None` when the response declares no content.
    pub body: Option<Shape>,
    pub content_type: Option<String>,
    pub description: Option<String>,
}

impl Response {
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_parse() {
        assert_eq!(StatusCode::parse("200"), Some(StatusCode::Code(200)));
        assert_eq!(StatusCode::parse("2XX"), Some(StatusCode::Range(2)));
        assert_eq!(StatusCode::parse("4xx"), Some(StatusCode::Range(4)));
        assert_eq!(StatusCode::parse("default"), Some(StatusCode::Default));
        assert_eq!(StatusCode::parse("20"), None);
        assert_eq!(StatusCode::parse("ok"), None);
        assert_eq!(StatusCode::parse("600"), None);
    }

    #[test]
    fn test_success_classes() {
        assert!(StatusCode::Code(204).is_success());
        assert!(StatusCode::Range(2).is_success());
        assert!(!StatusCode::Code(302).is_success());
        assert!(!StatusCode::Default.is_success());
    }

    #[test]
    fn test_method_keys() {
        assert_eq!(HttpMethod::from_key("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_key("head"), None);
        assert!(HttpMethod::Get.is_query());
        assert!(!HttpMethod::Delete.is_query());
    }
}
