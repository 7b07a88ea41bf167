//! Resource Paths
//!
//! Relative URLs a queryable reads from and writes to.

/// Read and write endpoints of one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    /// Target of GET requests (`/<model>/index.json`)
    pub get_url: String,
    /// Target of POST/PUT/DELETE requests (`/<model>/edit.json`)
    pub post_url: String,
}

impl ResourcePaths {
    /// Endpoints of a top-level model
    pub fn for_model(model: &str) -> Self {
        Self {
            get_url: format!("/{}/index.json", model),
            post_url: format!("/{}/edit.json", model),
        }
    }

    /// Endpoints of an association of one parent item
    pub fn for_association(model: &str, key: &str, association: &str) -> Self {
        Self {
            get_url: format!("/{}/{}/{}/index.json", model, key, association),
            post_url: format!("/{}/{}/{}/edit.json", model, key, association),
        }
    }

    /// Schema endpoint of a model
    pub fn schema(model: &str) -> String {
        format!("/{}/schema.json", model)
    }
}
