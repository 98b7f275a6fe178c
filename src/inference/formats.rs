//! Field readers for the supported file formats
//!
//! CSV and record formats (JSON, JSON Lines, YAML) are sampled and their
//! field types inferred; Parquet files carry a schema in their footer and
//! are read without touching row data.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ExtractError;
use super::source::FieldDescriptor;
use super::types::{FieldSet, ObservedField, ObservedType};

/// Options for delimited text sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// First row holds column names; otherwise columns are named `_c0.._cN`
    pub header: bool,
    pub delimiter: char,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            header: true,
            delimiter: ',',
        }
    }
}

impl CsvOptions {
    /// The delimiter as a single byte, if it is ASCII
    pub fn delimiter_byte(&self) -> Option<u8> {
        u8::try_from(self.delimiter).ok().filter(u8::is_ascii)
    }
}

fn sample_limit(sample_size: usize) -> usize {
    if sample_size == 0 { usize::MAX } else { sample_size }
}

/// Column names from a header row.
///
/// Blank headers take the positional `_cN` name. A repeated name gets the
/// first free `_2`, `_3`, .. suffix, so `a,a,` yields `a`, `a_2`, `_c2`.
fn column_names<'a>(headers: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<String> = headers
        .into_iter()
        .enumerate()
        .map(|(index, name)| match name.trim() {
            "" => format!("_c{}", index),
            trimmed => trimmed.to_string(),
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::new();
    raw.into_iter()
        .map(|name| {
            let mut unique = name.clone();
            let mut suffix = 2;
            while taken.contains(&unique) {
                unique = format!("{}_{}", name, suffix);
                suffix += 1;
            }
            taken.insert(unique.clone());
            unique
        })
        .collect()
}

/// Infer column types from a delimited text file
pub fn read_csv(
    path: &Path,
    options: &CsvOptions,
    sample_size: usize,
) -> Result<Vec<FieldDescriptor>, ExtractError> {
    let delimiter = options.delimiter_byte().ok_or_else(|| {
        ExtractError::access(path, format!("unsupported delimiter '{}'", options.delimiter))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.header)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ExtractError::access(path, e))?;

    let mut columns: Vec<ObservedField> = if options.header {
        let names = column_names(reader.headers().map_err(|e| ExtractError::access(path, e))?);
        names.into_iter().map(ObservedField::new).collect()
    } else {
        Vec::new()
    };

    let mut sampled = 0usize;
    for record in reader.records().take(sample_limit(sample_size)) {
        let record = record.map_err(|e| ExtractError::access(path, e))?;
        if !options.header {
            while columns.len() < record.len() {
                let mut column = ObservedField::new(format!("_c{}", columns.len()));
                // shorter earlier rows had no cell here
                column.nullable = sampled > 0;
                columns.push(column);
            }
        }
        for (index, column) in columns.iter_mut().enumerate() {
            column.record(record.get(index).and_then(ObservedType::of_text));
        }
        sampled += 1;
    }

    tracing::debug!(
        path = %path.display(),
        columns = columns.len(),
        sampled,
        "Inferred CSV columns"
    );

    Ok(columns
        .into_iter()
        .map(ObservedField::into_descriptor)
        .collect())
}

/// Infer fields from a JSON document holding one object or an array of objects
pub fn read_json(path: &Path, sample_size: usize) -> Result<Vec<FieldDescriptor>, ExtractError> {
    let content = fs::read_to_string(path).map_err(|e| ExtractError::access(path, e))?;
    let document: Value =
        serde_json::from_str(&content).map_err(|e| ExtractError::access(path, e))?;
    infer_records(path, &document, sample_size)
}

/// Infer fields from a JSON Lines file, one object per non-blank line
pub fn read_jsonl(path: &Path, sample_size: usize) -> Result<Vec<FieldDescriptor>, ExtractError> {
    let content = fs::read_to_string(path).map_err(|e| ExtractError::access(path, e))?;
    let mut fields = FieldSet::new();

    let lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .take(sample_limit(sample_size));
    for (index, line) in lines {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| ExtractError::access(path, format!("line {}: {}", index + 1, e)))?;
        let record = as_record(path, &value)?;
        fields.observe_record(record);
    }

    Ok(fields.into_descriptors())
}

/// Infer fields from a YAML document holding one mapping or a sequence of mappings
pub fn read_yaml(path: &Path, sample_size: usize) -> Result<Vec<FieldDescriptor>, ExtractError> {
    let content = fs::read_to_string(path).map_err(|e| ExtractError::access(path, e))?;
    let document: Value =
        serde_yaml::from_str(&content).map_err(|e| ExtractError::access(path, e))?;
    infer_records(path, &document, sample_size)
}

fn infer_records(
    path: &Path,
    document: &Value,
    sample_size: usize,
) -> Result<Vec<FieldDescriptor>, ExtractError> {
    let mut fields = FieldSet::new();
    match document {
        Value::Array(records) => {
            for value in records.iter().take(sample_limit(sample_size)) {
                fields.observe_record(as_record(path, value)?);
            }
        }
        Value::Object(record) => fields.observe_record(record),
        other => return Err(not_a_record(path, other)),
    }
    tracing::debug!(
        path = %path.display(),
        fields = fields.len(),
        records = fields.records(),
        "Inferred record fields"
    );
    Ok(fields.into_descriptors())
}

fn as_record<'a>(path: &Path, value: &'a Value) -> Result<&'a Map<String, Value>, ExtractError> {
    value.as_object().ok_or_else(|| not_a_record(path, value))
}

fn not_a_record(path: &Path, value: &Value) -> ExtractError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ExtractError::access(path, format!("expected object records, found {}", found))
}

/// Read the footer schema of a Parquet file
#[cfg(feature = "parquet")]
pub fn read_parquet(path: &Path) -> Result<Vec<FieldDescriptor>, ExtractError> {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let file = fs::File::open(path).map_err(|e| ExtractError::access(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| ExtractError::access(path, e))?;
    Ok(builder
        .schema()
        .fields()
        .iter()
        .map(|field| arrow_field(field))
        .collect())
}

#[cfg(feature = "parquet")]
fn arrow_field(field: &arrow::datatypes::Field) -> FieldDescriptor {
    use arrow::datatypes::DataType;

    let data_type = field.data_type();
    let (native, children) = match data_type {
        DataType::Boolean => ("boolean", Vec::new()),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => ("long", Vec::new()),
        DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => ("double", Vec::new()),
        DataType::Date32 | DataType::Date64 => ("date", Vec::new()),
        DataType::Timestamp(_, _) => ("timestamp", Vec::new()),
        DataType::List(element)
        | DataType::LargeList(element)
        | DataType::FixedSizeList(element, _) => ("array", vec![arrow_field(element)]),
        DataType::Struct(members) => (
            "struct",
            members.iter().map(|member| arrow_field(member)).collect(),
        ),
        DataType::Map(entries, _) => match entries.data_type() {
            DataType::Struct(members) => (
                "map",
                members.iter().map(|member| arrow_field(member)).collect(),
            ),
            _ => ("map", Vec::new()),
        },
        _ => ("string", Vec::new()),
    };

    FieldDescriptor::new(field.name().as_str(), native, field.is_nullable())
        .with_physical_type(data_type.to_string())
        .with_children(children)
}
