use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A server variable for URL templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    pub default: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

impl Server {
    /// The path part of the server URL.
    ///
    /// Absolute URLs (`scheme://authority/...`) contribute only their path;
    /// anything else is already a path and is returned unchanged.
    pub fn path_component(&self) -> &str {
        let url = self.url.as_str();
        match url.find("://") {
            Some(idx) if is_scheme(&url[..idx]) => {
                let rest = &url[idx + 3..];
                let path = rest.find('/').map_or("", |slash| &rest[slash..]);
                path.split(['?', '#']).next().unwrap_or_default()
            }
            _ => url,
        }
    }
}

/// A URI scheme, or a server variable standing in for one (`{scheme}`).
fn is_scheme(candidate: &str) -> bool {
    if candidate.starts_with('{') && candidate.ends_with('}') {
        return true;
    }
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(url: &str) -> Server {
        Server {
            url: url.to_string(),
            description: None,
            variables: IndexMap::new(),
        }
    }

    #[test]
    fn test_path_component_of_absolute_url() {
        assert_eq!(server("https://api.example.com/v2").path_component(), "/v2");
        assert_eq!(server("https://api.example.com").path_component(), "");
        assert_eq!(server("http://localhost:8080/api/?debug=1").path_component(), "/api/");
    }

    #[test]
    fn test_path_component_of_relative_url() {
        assert_eq!(server("/v3/").path_component(), "/v3/");
        assert_eq!(server("").path_component(), "");
    }

    #[test]
    fn test_templated_scheme() {
        assert_eq!(server("{scheme}://api.example.com/v1").path_component(), "/v1");
    }
}
