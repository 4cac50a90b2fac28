//! Generation options controlling synthesis output.
//!
//! Options are plain data so front-ends can load them from a configuration
//! file (missing keys fall back to the defaults) and then apply explicit
//! overrides.
//!
//! # Example YAML
//!
//! ```yaml
//! include_accessors: true
//! generate_builders: true
//! required_only_constructor: true
//! class_name_source: schema_title
//! ```

use serde::{Deserialize, Serialize};

/// Where a synthesized type takes its name from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassNameSource {
    /// Singularized, PascalCase form of the document title (the default).
    #[default]
    SchemaTitle,
    /// PascalCase form of the origin file stem, falling back to the title
    /// when no origin is recorded.
    FileName,
}

/// Switches controlling what a [`Synthesizer`](crate::Synthesizer) emits.
///
/// # Examples
///
/// ```
/// use collection_schema_core::GenerateOptions;
///
/// let options = GenerateOptions::default();
/// assert!(options.include_accessors);
/// assert!(options.required_only_constructor);
/// assert!(!options.generate_builders);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Render numeric fields as unboxed primitives; when off, numerics are
    /// marked for boxed (nullable) rendering.
    pub use_primitive_numeric_types: bool,
    /// Emit a getter/setter pair per field.
    pub include_accessors: bool,
    /// Emit a structural equality and hash contract over all fields.
    pub include_equality_contract: bool,
    /// Emit builder blueprints threading the constructor parameter list.
    pub generate_builders: bool,
    /// Restrict the constructor parameter list to primary-key fields;
    /// when off, every field becomes a parameter.
    pub required_only_constructor: bool,
    /// Record the runtime type tag (the document title) on the blueprint.
    pub include_type_discriminator: bool,
    /// Mark unknown instance properties as rejected during
    /// deserialization.
    pub treat_unknown_properties_as_error: bool,
    /// Type-name derivation source.
    pub class_name_source: ClassNameSource,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            use_primitive_numeric_types: true,
            include_accessors: true,
            include_equality_contract: true,
            generate_builders: false,
            required_only_constructor: true,
            include_type_discriminator: false,
            treat_unknown_properties_as_error: true,
            class_name_source: ClassNameSource::SchemaTitle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let options: GenerateOptions =
            serde_yaml::from_str("generate_builders: true\n").unwrap();

        assert!(options.generate_builders);
        assert!(options.include_accessors);
        assert!(options.required_only_constructor);
        assert_eq!(options.class_name_source, ClassNameSource::SchemaTitle);
    }

    #[test]
    fn test_class_name_source_spelling() {
        let options: GenerateOptions =
            serde_yaml::from_str("class_name_source: file_name\n").unwrap();
        assert_eq!(options.class_name_source, ClassNameSource::FileName);
    }
}
