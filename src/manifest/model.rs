// Serde view of the IIIF Presentation 2.x fields the reader needs.
//
// Identifiers are `@id` in 2.x JSON-LD; plain `id` is accepted too.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(rename = "@id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<Value>,
    pub sequences: Vec<Sequence>,
}

impl Manifest {
    /// Label as plain text, when the manifest gives a simple string.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub struct Sequence {
    pub canvases: Vec<Canvas>,
}

#[derive(Debug, Deserialize)]
pub struct Canvas {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
    pub images: Vec<Annotation>,
}

impl Canvas {
    /// Last `/`-separated segment of the canvas id.
    pub fn id_tail(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

/// Image annotation painting a canvas.
#[derive(Debug, Deserialize)]
pub struct Annotation {
    pub resource: Resource,
}

#[derive(Debug, Deserialize)]
pub struct Resource {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jsonld_ids() {
        let json = r#"{
            "@id": "https://example.org/iiif/book1/manifest",
            "label": "Book 1",
            "sequences": [{
                "canvases": [{
                    "@id": "https://example.org/iiif/book1/canvas/p1",
                    "images": [{"resource": {"@id": "https://example.org/img/p1/full/full/0/default.jpg"}}]
                }]
            }]
        }"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(
            manifest.id.as_deref(),
            Some("https://example.org/iiif/book1/manifest")
        );
        assert_eq!(manifest.label_text(), Some("Book 1"));
        let canvas = &manifest.sequences[0].canvases[0];
        assert_eq!(canvas.id_tail(), "p1");
        assert_eq!(
            canvas.images[0].resource.id,
            "https://example.org/img/p1/full/full/0/default.jpg"
        );
    }

    #[test]
    fn test_parse_plain_ids() {
        let json = r#"{"sequences": [{"canvases": [{"id": "c/7", "images": [{"resource": {"id": "r7"}}]}]}]}"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert!(manifest.id.is_none());
        assert_eq!(manifest.sequences[0].canvases[0].id_tail(), "7");
    }

    #[test]
    fn test_missing_resource_id_rejected() {
        let json = r#"{"sequences": [{"canvases": [{"@id": "c/1", "images": [{"resource": {}}]}]}]}"#;
        assert!(serde_json::from_str::<Manifest>(json).is_err());
    }

    #[test]
    fn test_label_non_string() {
        let json = r#"{"label": [{"@value": "x"}], "sequences": []}"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert!(manifest.label_text().is_none());
    }
}
