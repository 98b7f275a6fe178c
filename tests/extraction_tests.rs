//! Schema extraction tests

use std::cell::Cell;
use std::fs;
use std::rc::Rc;

use datadoc::inference::{
    CsvOptions, ExtractConfig, ExtractError, ExtractRequest, FieldDescriptor, LocalFileSource,
    SchemaExtractor, Selection, SessionOptions, SourceConnector, SourceFormat, SourceSession,
    SourceUnit,
};
use datadoc::mapping::{TypeMapping, map_type};
use datadoc::models::odcs::LogicalType;
use datadoc::validation::validate;
use tempfile::TempDir;

/// In-memory connector that counts opened and closed sessions
#[derive(Default)]
struct FakeSource {
    units: Vec<SourceUnit>,
    fields: Vec<FieldDescriptor>,
    fail_describe: bool,
    fail_close: bool,
    opened: Rc<Cell<usize>>,
    closed: Rc<Cell<usize>>,
}

struct FakeSession {
    units: Vec<SourceUnit>,
    fields: Vec<FieldDescriptor>,
    fail_describe: bool,
    fail_close: bool,
    closed: Rc<Cell<usize>>,
}

impl SourceConnector for FakeSource {
    type Session = FakeSession;

    fn open(&self, _options: &SessionOptions) -> Result<FakeSession, ExtractError> {
        self.opened.set(self.opened.get() + 1);
        Ok(FakeSession {
            units: self.units.clone(),
            fields: self.fields.clone(),
            fail_describe: self.fail_describe,
            fail_close: self.fail_close,
            closed: Rc::clone(&self.closed),
        })
    }
}

impl SourceSession for FakeSession {
    fn list_units(&mut self, selection: &Selection) -> Result<Vec<SourceUnit>, ExtractError> {
        if self.units.is_empty() {
            return Err(ExtractError::no_match(selection.to_string()));
        }
        Ok(self.units.clone())
    }

    fn describe(
        &mut self,
        unit: &SourceUnit,
        _format: SourceFormat,
    ) -> Result<Vec<FieldDescriptor>, ExtractError> {
        if self.fail_describe {
            return Err(ExtractError::access(&unit.id, "connection reset"));
        }
        Ok(self.fields.clone())
    }

    fn close(&mut self) -> Result<(), ExtractError> {
        self.closed.set(self.closed.get() + 1);
        if self.fail_close {
            return Err(ExtractError::access("fake", "close failed"));
        }
        Ok(())
    }
}

fn fake_with_fields(fields: Vec<FieldDescriptor>) -> FakeSource {
    FakeSource {
        units: vec![SourceUnit::new("mem://people", "people")],
        fields,
        ..Default::default()
    }
}

mod connector_tests {
    use super::*;

    #[test]
    fn test_fields_map_to_properties_in_order() {
        let source = fake_with_fields(vec![
            FieldDescriptor::new("age", "integer", false),
            FieldDescriptor::new("name", "string", true),
        ]);
        let extractor = SchemaExtractor::new(source);
        let schemas = extractor
            .extract(&ExtractRequest::path("people", SourceFormat::Csv))
            .unwrap();

        assert_eq!(schemas.len(), 1);
        let properties = schemas[0].properties();
        assert_eq!(properties.len(), 2);

        assert_eq!(properties[0].name(), "age");
        assert_eq!(properties[0].logical_type(), LogicalType::Integer);
        assert_eq!(properties[0].physical_type(), Some("integer"));
        assert!(properties[0].required());

        assert_eq!(properties[1].name(), "name");
        assert_eq!(properties[1].logical_type(), LogicalType::String);
        assert_eq!(properties[1].physical_type(), Some("string"));
        assert!(!properties[1].required());
    }

    #[test]
    fn test_zero_matches_is_no_match() {
        let source = FakeSource::default();
        let closed = Rc::clone(&source.closed);
        let err = SchemaExtractor::new(source)
            .extract(&ExtractRequest::pattern("warehouse/*.parquet", SourceFormat::Parquet))
            .unwrap_err();

        assert_eq!(
            err,
            ExtractError::NoMatch {
                pattern: "warehouse/*.parquet".to_string()
            }
        );
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_session_closed_once_on_success() {
        let source = fake_with_fields(vec![FieldDescriptor::new("id", "long", false)]);
        let (opened, closed) = (Rc::clone(&source.opened), Rc::clone(&source.closed));

        SchemaExtractor::new(source)
            .extract(&ExtractRequest::path("people", SourceFormat::Json))
            .unwrap();

        assert_eq!(opened.get(), 1);
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_session_closed_once_on_failure() {
        let source = FakeSource {
            fail_describe: true,
            ..fake_with_fields(Vec::new())
        };
        let (opened, closed) = (Rc::clone(&source.opened), Rc::clone(&source.closed));

        let err = SchemaExtractor::new(source)
            .extract(&ExtractRequest::path("people", SourceFormat::Json))
            .unwrap_err();

        assert!(matches!(err, ExtractError::SourceAccess { ref path, .. } if path == "mem://people"));
        assert_eq!(opened.get(), 1);
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_close_failure_after_failed_extraction_keeps_original_error() {
        let source = FakeSource {
            fail_describe: true,
            fail_close: true,
            ..fake_with_fields(Vec::new())
        };
        let closed = Rc::clone(&source.closed);

        let err = SchemaExtractor::new(source)
            .extract(&ExtractRequest::path("people", SourceFormat::Json))
            .unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_close_failure_after_success_is_reported() {
        let source = FakeSource {
            fail_close: true,
            ..fake_with_fields(vec![FieldDescriptor::new("id", "long", false)])
        };
        let closed = Rc::clone(&source.closed);

        let err = SchemaExtractor::new(source)
            .extract(&ExtractRequest::path("people", SourceFormat::Json))
            .unwrap_err();

        assert!(err.to_string().contains("close failed"));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_extracted_document_is_a_valid_contract_schema() {
        let source = fake_with_fields(vec![
            FieldDescriptor::new("id", "long", false),
            FieldDescriptor::new("attributes", "map", true)
                .with_children(vec![FieldDescriptor::new("color", "string", true)]),
            FieldDescriptor::new("history", "array", true)
                .with_physical_type("array<timestamp>")
                .with_children(vec![FieldDescriptor::new("element", "timestamp", true)]),
        ]);
        let document = SchemaExtractor::new(source)
            .extract_document(&ExtractRequest::path("people", SourceFormat::Json))
            .unwrap();
        let contract = document.into_contract("people-contract", "0.1.0");

        let value = serde_json::to_value(&contract).unwrap();
        assert_eq!(validate(&value).unwrap(), contract);
    }
}

mod mapping_tests {
    use super::*;

    #[test]
    fn test_map_type_is_total_and_case_insensitive() {
        for native in ["unrecognized_xyz", "", "BINARY", "decimal(38,0)", "uuid"] {
            assert!(LogicalType::ALL.contains(&map_type(native)), "{}", native);
        }
        assert_eq!(map_type("unrecognized_xyz"), LogicalType::String);
        assert_eq!(map_type("Integer"), map_type("integer"));
        assert_eq!(map_type("INTEGER"), LogicalType::Integer);
        assert_eq!(map_type("Timestamp"), LogicalType::Date);
        assert_eq!(map_type("STRUCT"), LogicalType::Object);
    }
}

mod local_file_tests {
    use super::*;

    #[test]
    fn test_csv_directory_extraction() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("users.csv"),
            "id,email,active,signup\n1,a@example.com,true,2024-03-01\n2,,false,2024-03-02\n",
        )
        .unwrap();
        fs::write(dir.path().join("orders.csv"), "order_id,amount\n10,9.99\n11,12\n").unwrap();

        let request = ExtractRequest::pattern(
            format!("{}/*.csv", dir.path().display()),
            SourceFormat::Csv,
        );
        let schemas = SchemaExtractor::new(LocalFileSource::new())
            .extract(&request)
            .unwrap();

        let names: Vec<&str> = schemas.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["orders", "users"]);

        let orders = &schemas[0];
        assert_eq!(orders.physical_type(), Some("csv"));
        let amount = orders.get_property("amount").unwrap();
        assert_eq!(amount.logical_type(), LogicalType::Number);
        assert_eq!(amount.physical_type(), Some("double"));

        let users = &schemas[1];
        let summary: Vec<(&str, LogicalType, bool)> = users
            .properties()
            .iter()
            .map(|p| (p.name(), p.logical_type(), p.required()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id", LogicalType::Integer, true),
                ("email", LogicalType::String, false),
                ("active", LogicalType::Boolean, true),
                ("signup", LogicalType::Date, true),
            ]
        );
    }

    #[test]
    fn test_json_file_with_nested_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"[
                {"id": 1, "user": {"name": "a", "age": 30}, "tags": ["x"]},
                {"id": 2, "user": {"name": "b"}, "tags": []}
            ]"#,
        )
        .unwrap();

        let schemas = SchemaExtractor::new(LocalFileSource::new())
            .extract(&ExtractRequest::path(&path, SourceFormat::Json).with_name("extracted_schema"))
            .unwrap();

        let schema = &schemas[0];
        assert_eq!(schema.name(), "extracted_schema");
        assert_eq!(schema.property_names(), vec!["id", "user", "tags"]);

        let user = schema.get_property("user").unwrap();
        assert_eq!(user.logical_type(), LogicalType::Object);
        let members = user.nested_properties().unwrap();
        assert_eq!(members[1].name(), "age");
        assert!(!members[1].required());

        let tags = schema.get_property("tags").unwrap();
        assert_eq!(tags.physical_type(), Some("array<string>"));
        assert_eq!(tags.items().unwrap().logical_type(), LogicalType::String);
    }

    #[test]
    fn test_missing_file_is_source_access() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        let err = SchemaExtractor::new(LocalFileSource::new())
            .extract(&ExtractRequest::path(&path, SourceFormat::Csv))
            .unwrap_err();
        assert_eq!(err.target(), path.display().to_string());
        assert!(matches!(err, ExtractError::SourceAccess { .. }));
    }

    #[test]
    fn test_same_file_stem_in_two_directories_is_rejected() {
        let dir = TempDir::new().unwrap();
        for sub in ["x", "y"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("a.csv"), "id\n1\n").unwrap();
        }

        let request = ExtractRequest::pattern(
            format!("{}/*/a.csv", dir.path().display()),
            SourceFormat::Csv,
        );
        let err = SchemaExtractor::new(LocalFileSource::new())
            .extract(&request)
            .unwrap_err();

        let first = dir.path().join("x").join("a.csv").display().to_string();
        let second = dir.path().join("y").join("a.csv").display().to_string();
        assert!(matches!(err, ExtractError::SourceAccess { .. }));
        assert_eq!(err.target(), second);
        let message = err.to_string();
        assert!(message.contains(&first), "{}", message);
        assert!(message.contains("schema name 'a'"), "{}", message);
    }

    #[test]
    fn test_unreadable_content_aborts_batch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"ok": true}"#).unwrap();
        fs::write(dir.path().join("b.json"), "{ not json").unwrap();

        let request = ExtractRequest::pattern(
            format!("{}/*.json", dir.path().display()),
            SourceFormat::Json,
        );
        let err = SchemaExtractor::new(LocalFileSource::new())
            .extract(&request)
            .unwrap_err();
        assert!(err.target().ends_with("b.json"));
    }

    #[test]
    fn test_config_driven_extraction() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("metrics.tsv");
        fs::write(&data, "1\t0.5\n2\t\n").unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(
            &config_path,
            format!(
                "data_path: {}\nformat: csv\nname: metrics\ncsv:\n  header: false\n  delimiter: \"\\t\"\ntype_overrides:\n  double: string\n",
                data.display()
            ),
        )
        .unwrap();

        let config = ExtractConfig::from_file(&config_path).unwrap();
        assert_eq!(
            config.csv,
            CsvOptions {
                header: false,
                delimiter: '\t'
            }
        );

        let extractor = SchemaExtractor::new(LocalFileSource::new().with_csv_options(config.csv))
            .with_mapping(config.type_mapping())
            .with_options(config.session_options());
        let document = extractor.extract_document(&config.request().unwrap()).unwrap();

        let schema = &document.schema[0];
        assert_eq!(schema.name(), "metrics");
        assert_eq!(schema.property_names(), vec!["_c0", "_c1"]);
        assert_eq!(schema.properties()[0].logical_type(), LogicalType::Integer);
        assert_eq!(schema.properties()[1].logical_type(), LogicalType::String);
        assert!(!schema.properties()[1].required());

        let yaml = document.to_yaml().unwrap();
        assert!(yaml.starts_with("schema:"));
        assert_ne!(config.type_mapping(), TypeMapping::default());
    }
}
