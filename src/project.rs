//! Project records and the ordered catalog loaded from `projects.json`.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{Result, SiteError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub carousel_image: String,
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Source order is kept; it is the order links are rendered in.
    #[serde(default, deserialize_with = "ordered_links")]
    pub links: Vec<ProjectLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLink {
    pub key: String,
    pub url: Option<String>,
}

impl ProjectLink {
    /// The URL, if present and not blank.
    pub fn href(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn kind(&self) -> LinkKind {
        LinkKind::from_key(&self.key)
    }
}

/// The fixed link key set. Anything else renders with a generic icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Demo,
    Github,
    Website,
    Poster,
    Other,
}

impl LinkKind {
    pub fn from_key(key: &str) -> Self {
        match key {
            "demo" => LinkKind::Demo,
            "github" => LinkKind::Github,
            "website" => LinkKind::Website,
            "poster" => LinkKind::Poster,
            _ => LinkKind::Other,
        }
    }

    /// Font Awesome classes for the icon circle.
    pub fn icon(self) -> &'static str {
        match self {
            LinkKind::Demo => "fa-external-link",
            LinkKind::Github => "fa-brands fa-github",
            LinkKind::Website => "fa-globe",
            LinkKind::Poster => "fa-file-pdf",
            LinkKind::Other => "fa-link",
        }
    }

    /// Display label; unknown keys show the raw key.
    pub fn label(self, key: &str) -> &str {
        match self {
            LinkKind::Demo => "Demo",
            LinkKind::Github => "GitHub",
            LinkKind::Website => "Website",
            LinkKind::Poster => "Poster",
            LinkKind::Other => key,
        }
    }
}

fn ordered_links<'de, D>(deserializer: D) -> Result<Vec<ProjectLink>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LinksVisitor;

    impl<'de> Visitor<'de> for LinksVisitor {
        type Value = Vec<ProjectLink>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of link keys to URLs")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut links = Vec::new();
            while let Some((key, url)) = map.next_entry::<String, Option<String>>()? {
                links.push(ProjectLink { key, url });
            }
            Ok(links)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(LinksVisitor)
}

/// All projects, in source order. Source order is carousel order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        let mut seen = HashSet::new();
        for project in &projects {
            if !seen.insert(project.id.as_str()) {
                return Err(SiteError::Catalog(format!("duplicate project id: {}", project.id)));
            }
            if project.images.is_empty() {
                return Err(SiteError::Catalog(format!("project {} has no images", project.id)));
            }
        }
        Ok(Self { projects })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let projects: Vec<Project> = serde_json::from_str(text)?;
        Self::new(projects)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": "orbit",
            "title": "Orbit",
            "carouselImage": "img/orbit.jpg",
            "images": ["img/orbit-1.jpg", "img/orbit-2.jpg"],
            "description": "A **tiny** sim",
            "technologies": ["Rust", "WebGL"],
            "links": {"website": "https://orbit.example", "github": "", "demo": null, "slides": "s.pdf"}
        },
        {
            "id": "loom",
            "title": "Loom",
            "carouselImage": "img/loom.jpg",
            "images": ["img/loom.jpg"]
        }
    ]"#;

    #[test]
    fn parses_in_source_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let ids: Vec<_> = catalog.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["orbit", "loom"]);
    }

    #[test]
    fn links_keep_source_key_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let keys: Vec<_> = catalog.projects()[0].links.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["website", "github", "demo", "slides"]);
    }

    #[test]
    fn blank_and_null_links_have_no_href() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let links = &catalog.projects()[0].links;
        assert_eq!(links[0].href(), Some("https://orbit.example"));
        assert_eq!(links[1].href(), None);
        assert_eq!(links[2].href(), None);
    }

    #[test]
    fn optional_sections_default_to_empty() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let loom = catalog.find("loom").unwrap();
        assert!(loom.links.is_empty());
        assert!(loom.technologies.is_empty());
        assert!(loom.description.is_empty());
    }

    #[test]
    fn unknown_link_kind_falls_back() {
        let kind = LinkKind::from_key("slides");
        assert_eq!(kind, LinkKind::Other);
        assert_eq!(kind.icon(), "fa-link");
        assert_eq!(kind.label("slides"), "slides");
        assert_eq!(LinkKind::Github.label("github"), "GitHub");
    }

    #[test]
    fn duplicate_ids_rejected() {
        let dup = vec![fixtures::project("a", 1), fixtures::project("a", 2)];
        let err = Catalog::new(dup).unwrap_err();
        assert!(err.to_string().contains("duplicate project id: a"));
    }

    #[test]
    fn empty_images_rejected() {
        let err = Catalog::new(vec![fixtures::project("a", 0)]).unwrap_err();
        assert!(matches!(err, SiteError::Catalog(_)));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, SiteError::Json(_)));
    }

    #[test]
    fn null_links_accepted() {
        let text = r#"[{"id":"x","title":"X","carouselImage":"x.jpg","images":["x.jpg"],"links":null}]"#;
        let catalog = Catalog::from_json(text).unwrap();
        assert!(catalog.projects()[0].links.is_empty());
    }
}
