//! Read-only project catalog shown on the portfolio.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::error::CatalogError;

/// A product listed on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "The Copy Agency")]
    pub name: String,
    pub tagline: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub product_hunt_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    /// Stripe product whose charges count as this project's revenue
    #[serde(default)]
    #[schema(example = "prod_TtUZxA8pNmQQRN")]
    pub stripe_product_id: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl Project {
    pub fn has_launched(&self) -> bool {
        self.product_hunt_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    /// Validates ids and names, then sorts by `order` and name.
    pub fn new(mut projects: Vec<Project>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for project in &projects {
            if project.id.trim().is_empty() {
                return Err(CatalogError::Invalid("project id must not be empty".to_string()));
            }
            if project.name.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "project {} has an empty name",
                    project.id
                )));
            }
            if !seen.insert(project.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate project id: {}",
                    project.id
                )));
            }
        }

        projects.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(Self { projects })
    }

    /// The catalog the site ships with.
    pub fn builtin() -> Self {
        Self {
            projects: vec![Project {
                id: "1".to_string(),
                name: "The Copy Agency".to_string(),
                tagline: "AI-powered copywriting for startups and founders".to_string(),
                description: Some(
                    "Professional AI copywriting that helps you create compelling marketing content, landing pages, and sales copy in minutes."
                        .to_string(),
                ),
                image_url: None,
                product_hunt_url: Some(
                    "https://www.producthunt.com/products/write-startup-copy-in-minutes?launch=write-startup-copy-in-minutes"
                        .to_string(),
                ),
                website_url: Some("https://thecopyagency.replit.app/".to_string()),
                stripe_product_id: Some("prod_TtUZxA8pNmQQRN".to_string()),
                featured: true,
                category: Some("AI Writing".to_string()),
                order: 0,
            }],
        }
    }

    pub fn from_yaml(source: &str, content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_yaml::from_str(content).map_err(|source_err| CatalogError::Parse {
                path: source.to_string(),
                source: source_err,
            })?;
        Self::new(file.projects)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml(&display, &content)
    }

    pub fn load_or_builtin(path: Option<&str>) -> Result<Self, CatalogError> {
        let catalog = match path.filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::load(Path::new(path))?,
            None => Self::builtin(),
        };
        info!(
            source = path.unwrap_or("builtin"),
            projects = catalog.len(),
            "Project catalog loaded"
        );
        Ok(catalog)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
projects:
  - id: copy
    name: The Copy Agency
    tagline: AI-powered copywriting
    stripeProductId: prod_copy
    productHuntUrl: https://www.producthunt.com/products/copy
    featured: true
    order: 1
  - id: notes
    name: Notes
    tagline: Quick notes
    order: 0
  - id: atlas
    name: Atlas
    tagline: Maps
    order: 1
"#;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 1);
        let project = catalog.get("1").unwrap();
        assert_eq!(project.stripe_product_id.as_deref(), Some("prod_TtUZxA8pNmQQRN"));
        assert!(project.has_launched());
    }

    #[test]
    fn test_from_yaml_sorts_by_order_then_name() {
        let catalog = Catalog::from_yaml("sample", SAMPLE).unwrap();
        let ids: Vec<&str> = catalog.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "atlas", "copy"]);

        let notes = catalog.get("notes").unwrap();
        assert!(!notes.featured);
        assert!(notes.stripe_product_id.is_none());
        assert!(!notes.has_launched());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let yaml = "projects:\n  - {id: a, name: A, tagline: x}\n  - {id: a, name: B, tagline: y}\n";
        let err = Catalog::from_yaml("dup", yaml).unwrap_err();
        assert_eq!(err.to_string(), "Invalid catalog: duplicate project id: a");
    }

    #[test]
    fn test_empty_name_rejected() {
        let yaml = "projects:\n  - {id: a, name: ' ', tagline: x}\n";
        assert!(matches!(
            Catalog::from_yaml("blank", yaml),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = Catalog::from_yaml("broken.yaml", "projects: [").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse catalog broken.yaml"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let catalog = Catalog::load_or_builtin(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn test_load_or_builtin_without_path() {
        assert_eq!(Catalog::load_or_builtin(None).unwrap().len(), 1);
        assert_eq!(Catalog::load_or_builtin(Some("")).unwrap().len(), 1);
    }

    #[test]
    fn test_project_json_is_camel_case() {
        let json = serde_json::to_value(Catalog::builtin().get("1").unwrap()).unwrap();
        assert_eq!(json["stripeProductId"], "prod_TtUZxA8pNmQQRN");
        assert_eq!(json["websiteUrl"], "https://thecopyagency.replit.app/");
        assert_eq!(json["imageUrl"], serde_json::Value::Null);
    }

    #[test]
    fn test_deploy_catalog_matches_builtin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("deploy/catalog.yaml");
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.projects(), Catalog::builtin().projects());
    }
}
