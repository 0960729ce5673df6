use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

const CLIENT_SUFFIX: &str = "-client";

/// Identifier for generated code: camelCase, or snake_case when `snake` is set.
///
/// Examples:
/// - `pet-id` → `petId` / `pet_id`
/// - `X-Request-ID` → `xRequestId` / `x_request_id`
pub fn js_name(name: &str, snake: bool) -> String {
    if snake {
        name.to_snake_case()
    } else {
        name.to_lower_camel_case()
    }
}

/// Class name for a client name: `sample-serv-client` → `SampleServClient`.
pub fn class_name(name: &str) -> String {
    name.to_upper_camel_case()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// The service part of a client name, without the trailing `-client`.
pub fn service_name(name: &str) -> &str {
    name.strip_suffix(CLIENT_SUFFIX).unwrap_or(name)
}
