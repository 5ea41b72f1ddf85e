use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::ParamError;

pub type RouteParams = HashMap<String, String>;
pub type RouteHandler = Box<dyn Fn(&RouteParams) + Send + Sync>;

struct Route {
    template: String,
    handler: RouteHandler,
}

/// Client-side path router. Routes are matched in registration order and
/// the first structural match wins, so callers must register specific
/// templates before general ones. Navigation keeps a history stack;
/// `back`/`forward` move the cursor and re-dispatch, the way a popstate
/// listener would.
pub struct PathRouter {
    routes: Vec<Route>,
    history: Vec<String>,
    cursor: usize,
    current: Option<usize>,
}

impl PathRouter {
    pub fn new() -> Self {
        PathRouter {
            routes: Vec::new(),
            history: Vec::new(),
            cursor: 0,
            current: None,
        }
    }

    pub fn add_route(&mut self, template: &str, handler: RouteHandler) {
        self.routes.push(Route {
            template: template.to_string(),
            handler,
        });
    }

    /// Pushes a new history entry (truncating any forward entries) and
    /// dispatches synchronously.
    pub fn navigate_to(&mut self, path: &str) -> bool {
        if !self.history.is_empty() {
            self.history.truncate(self.cursor + 1);
        }
        self.history.push(path.to_string());
        self.cursor = self.history.len() - 1;
        self.dispatch()
    }

    pub fn back(&mut self) -> bool {
        if self.cursor == 0 || self.history.is_empty() {
            return false;
        }
        self.cursor -= 1;
        self.dispatch()
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            return false;
        }
        self.cursor += 1;
        self.dispatch()
    }

    pub fn current_path(&self) -> Option<&str> {
        self.history.get(self.cursor).map(String::as_str)
    }

    /// Template of the route a dispatch last landed on.
    pub fn current_template(&self) -> Option<&str> {
        self.current
            .and_then(|idx| self.routes.get(idx))
            .map(|route| route.template.as_str())
    }

    /// Matches the current path against the route table. A miss is not an
    /// error; it is observable only through the diagnostic log and the
    /// `false` return.
    pub fn dispatch(&mut self) -> bool {
        let Some(full) = self.current_path() else {
            return false;
        };
        // The query string is not part of the match, only the path half.
        let path = full
            .split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(full)
            .to_string();

        for idx in 0..self.routes.len() {
            let template = self.routes[idx].template.clone();
            let matcher = match build_matcher(&template) {
                Ok(matcher) => matcher,
                Err(e) => {
                    warn!(template, error = %e, "unusable route template");
                    continue;
                }
            };
            if !matcher.is_match(&path) {
                continue;
            }
            match extract_params(&path, &template) {
                Ok(params) => {
                    self.current = Some(idx);
                    debug!(path, template, "route matched");
                    (self.routes[idx].handler)(&params);
                    return true;
                }
                Err(e) => {
                    // Unreachable for an anchored match; skip rather than fail.
                    warn!(path, template, error = %e, "param extraction failed");
                }
            }
        }

        debug!(path, "no route matched");
        false
    }
}

impl Default for PathRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the anchored matcher for a template: every `:name` placeholder
/// becomes a single-segment capture, every literal segment is escaped.
fn build_matcher(template: &str) -> Result<Regex, regex::Error> {
    let pattern = template
        .split('/')
        .map(|segment| {
            if segment.starts_with(':') {
                "([^/]+)".to_string()
            } else {
                regex::escape(segment)
            }
        })
        .collect::<Vec<_>>()
        .join("/");
    Regex::new(&format!("^{}$", pattern))
}

/// Positional split-and-pair extraction. Differing segment counts fail
/// fast instead of yielding undefined entries.
pub fn extract_params(path: &str, template: &str) -> Result<RouteParams, ParamError> {
    let path_parts: Vec<&str> = path.split('/').collect();
    let template_parts: Vec<&str> = template.split('/').collect();

    if path_parts.len() != template_parts.len() {
        return Err(ParamError::SegmentCountMismatch {
            template: template_parts.len(),
            path: path_parts.len(),
        });
    }

    let mut params = RouteParams::new();
    for (template_part, path_part) in template_parts.iter().zip(&path_parts) {
        if let Some(name) = template_part.strip_prefix(':') {
            params.insert(name.to_string(), (*path_part).to_string());
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_handler(log: &Arc<Mutex<Vec<String>>>, tag: &str) -> RouteHandler {
        let log = log.clone();
        let tag = tag.to_string();
        Box::new(move |params| {
            let id = params.get("id").cloned().unwrap_or_default();
            log.lock().unwrap().push(format!("{}:{}", tag, id));
        })
    }

    #[test]
    fn extracts_named_params() {
        let params = extract_params("/text/42", "/text/:id").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn extracts_params_in_placeholder_positions() {
        let params = extract_params("/sanskrit/texts/7", "/:lang/texts/:id").unwrap();
        assert_eq!(params.get("lang").map(String::as_str), Some("sanskrit"));
        assert_eq!(params.get("id").map(String::as_str), Some("7"));
    }

    #[test]
    fn segment_count_mismatch_fails_fast() {
        let err = extract_params("/text/42/extra", "/text/:id").unwrap_err();
        assert_eq!(
            err,
            ParamError::SegmentCountMismatch {
                template: 3,
                path: 4
            }
        );
    }

    #[test]
    fn dispatch_invokes_first_registered_match() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut router = PathRouter::new();
        // A general template registered first shadows the specific one;
        // registration order is the contract.
        router.add_route("/text/:id", recording_handler(&log, "general"));
        router.add_route("/text/new", recording_handler(&log, "specific"));

        assert!(router.navigate_to("/text/new"));
        assert_eq!(*log.lock().unwrap(), ["general:new"]);
    }

    #[test]
    fn dispatch_miss_is_silent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut router = PathRouter::new();
        router.add_route("/text/:id", recording_handler(&log, "text"));

        assert!(!router.navigate_to("/unknown"));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(router.current_template(), None);
        // The miss still left a history entry behind.
        assert_eq!(router.current_path(), Some("/unknown"));
    }

    #[test]
    fn query_string_is_not_matched() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut router = PathRouter::new();
        router.add_route("/search", recording_handler(&log, "search"));

        assert!(router.navigate_to("/search?q=kavya"));
        assert_eq!(router.current_path(), Some("/search?q=kavya"));
        assert_eq!(router.current_template(), Some("/search"));
    }

    #[test]
    fn literal_segments_do_not_match_placeholders_elsewhere() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut router = PathRouter::new();
        router.add_route("/text/:id", recording_handler(&log, "text"));

        assert!(!router.navigate_to("/texts/42"));
        assert!(!router.navigate_to("/text/42/comments"));
        assert!(router.navigate_to("/text/42"));
        assert_eq!(*log.lock().unwrap(), ["text:42"]);
    }

    #[test]
    fn back_and_forward_redispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut router = PathRouter::new();
        router.add_route("/text/:id", recording_handler(&log, "text"));

        router.navigate_to("/text/1");
        router.navigate_to("/text/2");
        assert!(router.back());
        assert_eq!(router.current_path(), Some("/text/1"));
        assert!(router.forward());
        assert_eq!(router.current_path(), Some("/text/2"));
        assert!(!router.forward());

        assert_eq!(
            *log.lock().unwrap(),
            ["text:1", "text:2", "text:1", "text:2"]
        );
    }

    #[test]
    fn navigate_after_back_truncates_forward_entries() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut router = PathRouter::new();
        router.add_route("/text/:id", recording_handler(&log, "text"));

        router.navigate_to("/text/1");
        router.navigate_to("/text/2");
        router.back();
        router.navigate_to("/text/3");

        assert!(!router.forward());
        assert_eq!(router.current_path(), Some("/text/3"));
    }
}
