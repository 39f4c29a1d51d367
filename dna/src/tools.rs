//! Named operations exposed to protocol transports.
//!
//! A transport hands over an operation name and a JSON argument object;
//! [`Operation::parse`] turns that into a typed request and
//! [`DnaOps::execute`] runs it. Foreseen failures come back as
//! `{"error": ..., "kind": ...}` payloads; only an unknown name or
//! undecodable arguments surface as [`ToolError`].

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::error::{ErrorKind, QueryError};
use crate::input::RsidInput;
use crate::ops::DnaOps;
use crate::results::ErrorPayload;
use crate::store::SubjectStore;

pub const LIST_SUBJECTS: &str = "list_subjects";
pub const GET_TEST_INFO: &str = "get_test_info";
pub const GET_SUBJECT_INFO: &str = "get_subject_info";
pub const QUERY_SNP_DATA: &str = "query_snp_data";

/// Arguments of `list_subjects`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListSubjectsParams {
    /// Optional regex pattern; only subjects whose names contain a match are returned.
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Arguments of `get_test_info` and `get_subject_info`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SubjectParams {
    /// The name of the subject.
    pub subject_name: String,
}

/// Arguments of `query_snp_data`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QuerySnpParams {
    /// The name of the subject.
    pub subject_name: String,
    /// A single RSID or a list of 1-10 RSIDs, e.g. `"rs3131972"` or `["rs3131972", "rs1815739"]`.
    pub rsids: RsidInput,
}

/// A decoded operation request.
#[derive(Debug, Clone)]
pub enum Operation {
    ListSubjects(ListSubjectsParams),
    GetTestInfo(SubjectParams),
    GetSubjectInfo(SubjectParams),
    QuerySnpData(QuerySnpParams),
}

/// Request that could not be turned into an [`Operation`].
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    #[error("Invalid arguments for {operation}: {source}")]
    InvalidArguments {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Operation {
    /// Decode `arguments` for the operation called `name`.
    ///
    /// `null` arguments are treated as an empty object.
    ///
    /// # Errors
    /// [`ToolError::UnknownOperation`] for an unrecognized name,
    /// [`ToolError::InvalidArguments`] if the arguments do not match the
    /// operation's schema.
    pub fn parse(name: &str, arguments: Value) -> Result<Self, ToolError> {
        let arguments = if arguments.is_null() {
            Value::Object(Map::new())
        } else {
            arguments
        };

        match name {
            LIST_SUBJECTS => decode(LIST_SUBJECTS, arguments).map(Self::ListSubjects),
            GET_TEST_INFO => decode(GET_TEST_INFO, arguments).map(Self::GetTestInfo),
            GET_SUBJECT_INFO => decode(GET_SUBJECT_INFO, arguments).map(Self::GetSubjectInfo),
            QUERY_SNP_DATA => decode(QUERY_SNP_DATA, arguments).map(Self::QuerySnpData),
            other => Err(ToolError::UnknownOperation(other.to_owned())),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListSubjects(_) => LIST_SUBJECTS,
            Self::GetTestInfo(_) => GET_TEST_INFO,
            Self::GetSubjectInfo(_) => GET_SUBJECT_INFO,
            Self::QuerySnpData(_) => QUERY_SNP_DATA,
        }
    }
}

fn decode<T: DeserializeOwned>(operation: &'static str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments)
        .map_err(|source| ToolError::InvalidArguments { operation, source })
}

/// Name, description and input schema of an operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Descriptors for every operation, in a stable order.
#[must_use]
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: LIST_SUBJECTS,
            description: "List all available DNA test subjects. Each subject represents an \
                          individual with genetic test data available for analysis. An optional \
                          regex pattern filters subject names.",
            input_schema: schemars::schema_for!(ListSubjectsParams).to_value(),
        },
        ToolDescriptor {
            name: GET_TEST_INFO,
            description: "Get metadata about a subject's DNA test (not the subject personally): \
                          testing company, test date, array version, data format and usage terms.",
            input_schema: schemars::schema_for!(SubjectParams).to_value(),
        },
        ToolDescriptor {
            name: GET_SUBJECT_INFO,
            description: "Get information about a subject as a person, such as demographics, \
                          background or other personal metadata.",
            input_schema: schemars::schema_for!(SubjectParams).to_value(),
        },
        ToolDescriptor {
            name: QUERY_SNP_DATA,
            description: "Query SNP data for 1-10 RSIDs from a subject's genetic data. Returns \
                          the comma-delimited header (rsid, chromosome, position, allele1, \
                          allele2), the matching rows, and which RSIDs were found or not found. \
                          At most 10 RSIDs per query for privacy protection.",
            input_schema: schemars::schema_for!(QuerySnpParams).to_value(),
        },
    ]
}

impl<S: SubjectStore> DnaOps<S> {
    /// Run a decoded operation and render its result payload.
    pub async fn execute(&self, operation: Operation) -> Value {
        let name = operation.name();
        match operation {
            Operation::ListSubjects(p) => render(name, self.list_subjects(p.pattern.as_deref()).await),
            Operation::GetTestInfo(p) => render(name, self.get_test_info(&p.subject_name).await),
            Operation::GetSubjectInfo(p) => {
                render(name, self.get_subject_info(&p.subject_name).await)
            }
            Operation::QuerySnpData(p) => render(
                name,
                self.query_snp_data(&p.subject_name, p.rsids).await,
            ),
        }
    }

    /// Decode and run the operation called `name`.
    ///
    /// # Errors
    /// See [`Operation::parse`].
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let operation = Operation::parse(name, arguments)?;
        Ok(self.execute(operation).await)
    }
}

fn render<T: Serialize>(operation: &str, result: Result<T, QueryError>) -> Value {
    let payload = match result {
        Ok(value) => serde_json::to_value(value),
        Err(err) => {
            tracing::debug!(operation, kind = ?err.kind(), error = %err, "operation failed");
            serde_json::to_value(ErrorPayload::from(&err))
        }
    };
    payload.unwrap_or_else(|e| {
        json!({
            "error": format!("Error serializing {operation} result: {e}"),
            "kind": ErrorKind::Io,
        })
    })
}
