use std::error::Error;

pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod gateway;
pub mod model;
pub mod router;
pub mod supabase;
pub mod view;

pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

/// Joins an API base url and a path without doubling the separator.
pub fn api_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_without_double_slash() {
        assert_eq!(
            api_url("https://api.example.com/v1/", "/languages"),
            "https://api.example.com/v1/languages"
        );
        assert_eq!(
            api_url("https://api.example.com/v1", "texts/featured"),
            "https://api.example.com/v1/texts/featured"
        );
    }
}
