//! Route table.
//!
//! `/` and `/documents` list documents, `/documents/new` starts a new one and
//! `/documents/{id}` opens an existing one. Hash fragments (`#documents/3`)
//! are accepted as well.

use crate::model::document::DocumentId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

const NEW_SEGMENT: &str = "new";

static ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:documents(?:/(?P<target>[^/?#]+))?)?/?$").expect("valid route regex")
});

/// Resolved application location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Listing,
    NewDocument,
    Document(DocumentId),
}

impl Route {
    /// Parses a path or hash fragment.
    ///
    /// Returns `None` for locations outside the route table.
    pub fn parse(location: &str) -> Option<Self> {
        let trimmed = location
            .trim()
            .trim_start_matches('#')
            .trim_start_matches('/');
        let caps = ROUTE_RE.captures(trimmed)?;
        match caps.name("target").map(|m| m.as_str()) {
            None => Some(Self::Listing),
            Some(NEW_SEGMENT) => Some(Self::NewDocument),
            Some(id) => Some(Self::Document(DocumentId::new(id))),
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Listing => "/documents".to_string(),
            Self::NewDocument => format!("/documents/{NEW_SEGMENT}"),
            Self::Document(id) => format!("/documents/{id}"),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
