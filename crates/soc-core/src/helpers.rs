//! Functions templates call while rendering a model.
//!
//! Each render builds its own [`Helpers`] from the run's options; nothing
//! here holds state shared between runs.

use indexmap::IndexMap;

use crate::options::GenerationOptions;
use crate::parse::content::{
    APPLICATION_JSON, DEFAULT_RESPONSE, FORM_URL_ENCODED, MULTIPART_FORM_DATA, MediaType, RequestBody,
};
use crate::transform::name_normalizer::js_name;

/// Option-dependent helpers for one render call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Helpers {
    pub snake: bool,
}

impl Helpers {
    pub fn new(options: &GenerationOptions) -> Self {
        Self {
            snake: options.snake,
        }
    }

    /// Identifier casing for generated code.
    pub fn js(&self, name: &str) -> String {
        js_name(name, self.snake)
    }
}

/// The `application/json` media type of a body.
pub fn json(body: &RequestBody) -> Option<&MediaType> {
    body.media_type(APPLICATION_JSON)
}

pub fn is_multipart_form_data(body: &RequestBody) -> bool {
    body.media_type(MULTIPART_FORM_DATA).is_some()
}

pub fn is_form_url_encoded(body: &RequestBody) -> bool {
    body.media_type(FORM_URL_ENCODED).is_some()
}

/// Response keys other than `default`, in document order.
pub fn status_codes<T>(responses: &IndexMap<String, T>) -> Vec<String> {
    responses
        .keys()
        .filter(|k| k.as_str() != DEFAULT_RESPONSE)
        .cloned()
        .collect()
}

pub fn has_default<T>(responses: &IndexMap<String, T>) -> bool {
    responses.contains_key(DEFAULT_RESPONSE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(yaml: &str) -> RequestBody {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_js_casing() {
        let camel = Helpers::default();
        assert_eq!(camel.js("pet_id"), "petId");
        assert_eq!(camel.js("PET-ID"), "petId");

        let snake = Helpers { snake: true };
        assert_eq!(snake.js("petId"), "pet_id");
        assert_eq!(snake.js("PET-ID"), "pet_id");
    }

    #[test]
    fn test_content_type_detection() {
        let json_body = body("content:\n  application/json:\n    schema: { type: object }");
        let multipart = body("content:\n  multipart/form-data:\n    schema: { type: object }");
        let form = body("content:\n  application/x-www-form-urlencoded:\n    schema: { type: object }");

        assert!(json(&json_body).is_some());
        assert!(json(&RequestBody::default()).is_none());
        assert!(is_multipart_form_data(&multipart));
        assert!(!is_multipart_form_data(&json_body));
        assert!(is_form_url_encoded(&form));
        assert!(!is_form_url_encoded(&RequestBody::default()));
    }

    #[test]
    fn test_status_codes() {
        let mut responses = IndexMap::new();
        responses.insert("200".to_string(), ());
        responses.insert("404".to_string(), ());
        assert!(!has_default(&responses));
        responses.insert("default".to_string(), ());
        assert_eq!(status_codes(&responses), vec!["200", "404"]);
        assert!(has_default(&responses));
    }
}
