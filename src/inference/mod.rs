//! Schema extraction from data sources
//!
//! This module derives ODCS schema objects from existing data, mapping each
//! source field's native type through the [type mapper](crate::mapping).
//!
//! ## Features
//!
//! - **Capability traits** - [`SourceConnector`] / [`SourceSession`] abstract the data source
//! - **Local files** - CSV, JSON, JSON Lines and YAML (plus Parquet with the `parquet` feature)
//! - **Type inference** - Sampled records are classified and merged per field
//! - **Nested structure** - Structs become `object` properties, lists become `array` with `items`
//! - **Scoped sessions** - Every opened session is closed, whether extraction succeeds or fails
//!
//! ## Example
//!
//! ```rust,no_run
//! use datadoc::inference::{ExtractConfig, LocalFileSource, SchemaExtractor};
//!
//! let config = ExtractConfig::from_file("config.yaml")?;
//! let extractor = SchemaExtractor::new(LocalFileSource::new().with_csv_options(config.csv))
//!     .with_mapping(config.type_mapping())
//!     .with_options(config.session_options());
//!
//! let document = extractor.extract_document(&config.request()?)?;
//! println!("{}", document.to_yaml()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod extractor;
mod formats;
mod local;
mod source;
mod types;

pub use config::{ConfigError, ExtractConfig, ExtractConfigBuilder};
pub use error::ExtractError;
pub use extractor::{ExtractRequest, SchemaDocument, SchemaExtractor};
pub use formats::CsvOptions;
pub use local::{LocalFileSource, LocalSession};
pub use source::{
    DEFAULT_SAMPLE_SIZE, FieldDescriptor, Selection, SessionOptions, SourceConnector,
    SourceFormat, SourceSession, SourceUnit, UnknownFormat,
};
pub use types::{FieldSet, ObservedField, ObservedType};
