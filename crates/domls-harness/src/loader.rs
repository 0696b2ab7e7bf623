//! Document loader.

use std::io;
use std::path::Path;

use dom_engine_traits::{DomEngine, Error as EngineError};

use crate::error::LoadError;

/// Load and parse the XML file at `path` into a document owned by
/// `engine`.
///
/// The caller always owns the returned handle; releasing the document
/// is the engine's drop, so the adopt-or-not switch of classic LS
/// parsers has no equivalent here. No document is produced on failure.
pub fn load<E: DomEngine>(engine: &mut E, path: &Path) -> Result<E::Node, LoadError> {
    let xml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
        _ => LoadError::EngineFailure(e.to_string()),
    })?;
    engine.parse_str(&xml).map_err(|e| match e {
        EngineError::Parse(msg) => LoadError::MalformedMarkup(msg),
        other => LoadError::EngineFailure(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use dom_engine_traits::{NodeKind, ParserOptions};
    use quickxml_adapter::QuickXmlEngine;

    #[test]
    fn missing_file_is_not_found() {
        let mut engine = QuickXmlEngine::new(ParserOptions::default());
        let err = load(&mut engine, Path::new("/no/such/file.xml")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn bad_markup_is_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<root><unclosed></root>").unwrap();

        let mut engine = QuickXmlEngine::new(ParserOptions::default());
        let err = load(&mut engine, file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedMarkup(_)));
    }

    #[test]
    fn well_formed_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<root><a/></root>\n").unwrap();

        let mut engine = QuickXmlEngine::new(ParserOptions::default());
        let doc = load(&mut engine, file.path()).unwrap();
        assert_eq!(engine.node_kind(&doc), NodeKind::Document);
        assert!(engine.document_element(&doc).is_some());
    }
}
