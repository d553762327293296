use super::types::RouteFile;
use anyhow::Context;
use std::path::Path;

/// Serialization format of a route declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFileFormat {
    Yaml,
    Json,
}

impl RouteFileFormat {
    /// `.yaml`/`.yml` are YAML, everything else is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .map(|s| s == "yaml" || s == "yml")
            .unwrap_or(false)
        {
            RouteFileFormat::Yaml
        } else {
            RouteFileFormat::Json
        }
    }
}

/// Read and deserialize a route declaration file.
pub fn load_routes(path: &Path) -> anyhow::Result<RouteFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route file {}", path.display()))?;
    load_routes_from_str(&content, RouteFileFormat::from_path(path))
        .with_context(|| format!("failed to parse route file {}", path.display()))
}

/// Deserialize route declarations from an in-memory document.
pub fn load_routes_from_str(content: &str, format: RouteFileFormat) -> anyhow::Result<RouteFile> {
    let routes = match format {
        RouteFileFormat::Yaml => serde_yaml::from_str(content)?,
        RouteFileFormat::Json => serde_json::from_str(content)?,
    };
    Ok(routes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RouteFileFormat::from_path(Path::new("routes.yml")),
            RouteFileFormat::Yaml
        );
        assert_eq!(
            RouteFileFormat::from_path(Path::new("routes.yaml")),
            RouteFileFormat::Yaml
        );
        assert_eq!(
            RouteFileFormat::from_path(Path::new("routes.json")),
            RouteFileFormat::Json
        );
    }

    #[test]
    fn test_load_json_file() {
        let mut temp = NamedTempFile::with_suffix(".json").expect("create temp file");
        temp.write_all(
            br#"{"handlers": [{"name": "health", "method": "GET", "path": "/health", "produces": ["text/plain"]}]}"#,
        )
        .expect("write routes");
        temp.flush().expect("flush");

        let routes = load_routes(temp.path()).unwrap();
        assert!(routes.groups.is_empty());
        assert_eq!(routes.handlers.len(), 1);
        assert_eq!(
            routes.handlers[0].produces.as_deref(),
            Some(&["text/plain".to_string()][..])
        );
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_routes(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn test_negotiation_section_is_optional() {
        let routes = load_routes_from_str("handlers: []", RouteFileFormat::Yaml).unwrap();
        assert_eq!(routes.negotiation.format_parameter, "$format");
    }
}
