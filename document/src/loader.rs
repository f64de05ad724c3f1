//! Reading spec documents from files and strings.

use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::document::SpecDocument;
use crate::error::Result;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from a file extension. Anything other than `.json`
    /// is read as YAML, which also accepts most JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Loads a document, choosing the format by extension.
///
/// # Errors
///
/// Returns [`Io`](crate::DocumentError::Io) if the file cannot be read, or
/// [`Json`](crate::DocumentError::Json) / [`Yaml`](crate::DocumentError::Yaml)
/// if parsing fails.
pub fn load(path: impl AsRef<Path>) -> Result<SpecDocument> {
    let path = path.as_ref();
    let format = Format::from_path(path);
    let reader = BufReader::new(std::fs::File::open(path)?);
    let doc: SpecDocument = match format {
        Format::Json => serde_json::from_reader(reader)?,
        Format::Yaml => serde_yaml::from_reader(reader)?,
    };
    debug!(path = %path.display(), ?format, name = %doc.name, entries = doc.args.len(), "Loaded spec document");
    Ok(doc)
}

/// Parses a YAML document.
pub fn from_yaml_str(text: &str) -> Result<SpecDocument> {
    Ok(serde_yaml::from_str(text)?)
}

/// Parses a JSON document.
pub fn from_json_str(text: &str) -> Result<SpecDocument> {
    Ok(serde_json::from_str(text)?)
}

impl SpecDocument {
    /// Writes the document, choosing the format by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        match Format::from_path(path) {
            Format::Json => serde_json::to_writer_pretty(writer, self)?,
            Format::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("spec.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("spec.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("spec.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("spec")), Format::Yaml);
    }

    #[test]
    fn test_yaml_accepts_json_text() {
        let doc = from_yaml_str(r#"{"name": "t", "args": []}"#).unwrap();
        assert_eq!(doc.name, "t");
    }
}
