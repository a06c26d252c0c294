//! All-or-nothing parsing of raw dump payloads

use viz_types::Document;

use super::DocumentSource;
use crate::error::{VizError, VizResult};

/// Parse a raw JSON payload into a `Document`
pub fn parse_document(text: &str) -> VizResult<Document> {
    serde_json::from_str(text).map_err(VizError::MalformedDocument)
}

/// Fetch `name` from `source` and parse it
pub async fn load_document(source: &dyn DocumentSource, name: &str) -> VizResult<Document> {
    let text = source.fetch(name).await?;
    let doc = parse_document(&text)?;
    tracing::info!(
        name,
        nodes = doc.nodes.len(),
        edges = doc.edges.len(),
        frames = doc.frames.len(),
        "document loaded"
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let doc = parse_document(r#"{"nodes": [], "edges": [], "frames": []}"#).unwrap();
        assert!(doc.nodes.is_empty());
    }

    #[test]
    fn test_malformed_payloads() {
        for raw in [
            "",
            "not json",
            r#"{"nodes": {}, "edges": [], "frames": []}"#,
            r#"{"nodes": [[{"alloc_id": 1, "offset": 0}, {"alloc_bytes": []}]], "edges": [], "frames": []}"#,
            r#"{"nodes": [], "edges": [[{"alloc_id": 1, "offset": 0, "ty": "T"}]], "frames": []}"#,
            r#"{"nodes": [[{"alloc_id": 1, "offset": 0, "ty": "T"}, {"alloc_bytes": [256]}]], "edges": [], "frames": []}"#,
        ] {
            let err = parse_document(raw).unwrap_err();
            assert!(
                matches!(err, VizError::MalformedDocument(_)),
                "{raw:?} gave {err:?}"
            );
        }
    }
}
