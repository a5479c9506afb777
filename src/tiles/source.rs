use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// URL template with `{z}`, `{x}`, `{y}` and optional `{s}` placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSource {
    template: String,
    subdomains: Vec<String>,
}

impl TemplateSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subdomains: Vec::new(),
        }
    }

    pub fn with_subdomains(mut self, subdomains: &[&str]) -> Self {
        self.subdomains = subdomains.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Whether the string looks like a tile template rather than a plain image URL
    pub fn is_template(locator: &str) -> bool {
        ["{z}", "{x}", "{y}"].iter().all(|p| locator.contains(p))
    }
}

impl TileSource for TemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = self
            .template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if !self.subdomains.is_empty() {
            let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
            url = url.replace("{s}", &self.subdomains[idx]);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_substitution() {
        let source = TemplateSource::new("https://cdn.example.com/atlas/{z}/{x}/{y}.png");
        assert_eq!(
            source.url(TileCoord::new(3, 7, 5)),
            "https://cdn.example.com/atlas/5/3/7.png"
        );
    }

    #[test]
    fn test_subdomain_rotation() {
        let source = TemplateSource::new("https://{s}.example.com/{z}/{x}/{y}.png")
            .with_subdomains(&["a", "b"]);
        assert_eq!(source.url(TileCoord::new(0, 0, 1)), "https://a.example.com/1/0/0.png");
        assert_eq!(source.url(TileCoord::new(1, 0, 1)), "https://b.example.com/1/1/0.png");
    }

    #[test]
    fn test_is_template() {
        assert!(TemplateSource::is_template("tiles/{z}/{x}/{y}.jpg"));
        assert!(!TemplateSource::is_template("https://example.com/map.png"));
    }
}
