//! Execution request DTOs

use serde::Deserialize;

/// Code execution request
///
/// `code` and `language` default to empty strings so that a missing field is
/// reported by the pipeline (`EmptyCode`, `UnsupportedLanguage`) rather than
/// as a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub language: String,

    /// Standard input for the program
    pub input: Option<String>,

    /// Compared with the output to set `isCorrect`; never used for admission
    pub expected_output: Option<String>,

    /// Accepted for compatibility, not forwarded
    pub compiler_options: Option<String>,
}
