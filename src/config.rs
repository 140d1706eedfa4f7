//! Parser factory configuration

use xml::reader::ParserConfig;

use crate::builder::DocumentBuilder;
use crate::errors::DOMError;
use crate::parsers::TreeOptions;

/// Options a [`DocumentBuilder`] is created with.
///
/// Every option the underlying engine cannot honour is rejected by [`BuilderConfig::build`]
/// instead of being silently ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    namespace_aware: bool,
    validating: bool,
    resolve_external_entities: bool,
    ignoring_comments: bool,
    coalescing: bool,
    ignoring_whitespace: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        BuilderConfig {
            namespace_aware: true,
            validating: false,
            resolve_external_entities: false,
            ignoring_comments: false,
            coalescing: false,
            ignoring_whitespace: false,
        }
    }

    /// Resolve prefixes to namespace URIs. xml-rs cannot turn this off.
    pub fn namespace_aware(mut self, namespace_aware: bool) -> Self {
        self.namespace_aware = namespace_aware;
        self
    }

    /// Validate against the document's DTD. Not supported.
    pub fn validating(mut self, validating: bool) -> Self {
        self.validating = validating;
        self
    }

    /// Fetch and expand external entities. Not supported.
    pub fn resolve_external_entities(mut self, resolve: bool) -> Self {
        self.resolve_external_entities = resolve;
        self
    }

    pub fn ignoring_comments(mut self, ignoring_comments: bool) -> Self {
        self.ignoring_comments = ignoring_comments;
        self
    }

    /// Turn CDATA sections into text and merge them with adjacent text.
    pub fn coalescing(mut self, coalescing: bool) -> Self {
        self.coalescing = coalescing;
        self
    }

    /// Drop text nodes that consist only of whitespace.
    pub fn ignoring_whitespace(mut self, ignoring_whitespace: bool) -> Self {
        self.ignoring_whitespace = ignoring_whitespace;
        self
    }

    pub fn is_namespace_aware(&self) -> bool {
        self.namespace_aware
    }

    pub fn build(&self) -> Result<DocumentBuilder, DOMError> {
        if !self.namespace_aware {
            return Err(DOMError::ConfigurationError(
                "namespace processing cannot be disabled".to_string(),
            ));
        }
        if self.validating {
            return Err(DOMError::ConfigurationError(
                "validating parsers are not available".to_string(),
            ));
        }
        if self.resolve_external_entities {
            return Err(DOMError::ConfigurationError(
                "external entity resolution is not available".to_string(),
            ));
        }

        Ok(DocumentBuilder::new(self.parser_config(), self.tree_options()))
    }

    fn parser_config(&self) -> ParserConfig {
        ParserConfig::new()
            .trim_whitespace(false)
            .whitespace_to_characters(false)
            .cdata_to_characters(self.coalescing)
            .coalesce_characters(true)
            .ignore_comments(self.ignoring_comments)
    }

    fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            ignoring_whitespace: self.ignoring_whitespace,
        }
    }
}

#[test]
fn test_default_config_builds() {
    let config = BuilderConfig::default();
    assert!(config.is_namespace_aware());
    assert!(config.build().is_ok());
}

#[test]
fn test_unsupported_options_are_configuration_errors() {
    let configs = [
        BuilderConfig::new().namespace_aware(false),
        BuilderConfig::new().validating(true),
        BuilderConfig::new().resolve_external_entities(true),
    ];

    for config in configs {
        let error = config.build().unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Configuration, "{:?}", config);
    }
}
