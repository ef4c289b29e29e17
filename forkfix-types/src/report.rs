use crate::pass::{PassId, SafetyClass};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level run report, serialized to `report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub verdict: Verdict,
    pub summary: RunSummary,

    #[serde(default)]
    pub passes: Vec<PassOutcome>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RunReport {
    pub fn new(tool: ToolInfo) -> Self {
        Self {
            schema: crate::schema::FORKFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo::started_now(),
            verdict: Verdict::default(),
            summary: RunSummary::default(),
            passes: Vec::new(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: String,
    pub started_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RunInfo {
    pub fn started_now() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now().to_rfc3339(),
            ended_at: None,
            duration_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub status: RunStatus,
    pub counts: Counts,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counts {
    pub info: u64,
    pub warn: u64,
    pub error: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub passes_selected: u64,
    pub passes_run: u64,
    pub passes_skipped: u64,
    pub files_scanned: u64,
    pub files_modified: u64,
    pub files_failed: u64,
    pub fixes_applied: u64,
}

/// Outcome of one pass over its file set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassOutcome {
    pub pass: PassId,
    pub safety: SafetyClass,
    pub status: PassStatus,

    /// Populated when the pass was skipped (policy, safety gate, missing params, cap).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default)]
    pub files: Vec<FileOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    Ran,
    Skipped,
}

/// Outcome of one pass on one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: String,
    pub status: FileStatus,
    pub fixes: u64,

    /// Variable names (or other fix subjects) touched in this file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_sha256: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_sha256: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Modified,
    Unchanged,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "forkfix".into(),
            version: "0.0.0-test".into(),
            commit: None,
        }
    }

    #[test]
    fn new_report_carries_schema_and_run_id() {
        let report = RunReport::new(tool());
        assert_eq!(report.schema, crate::schema::FORKFIX_REPORT_V1);
        assert_eq!(report.run.run_id.len(), 36);
        assert!(report.run.ended_at.is_none());
        assert_eq!(report.verdict.status, RunStatus::Pass);
    }

    #[test]
    fn report_roundtrips_through_json() {
        let mut report = RunReport::new(tool());
        report.passes.push(PassOutcome {
            pass: PassId::new("gn.repair_malformed_assignments"),
            safety: SafetyClass::Safe,
            status: PassStatus::Ran,
            reason: None,
            files: vec![FileOutcome {
                path: "src/build/config.gni".into(),
                status: FileStatus::Modified,
                fixes: 2,
                subjects: vec!["sources".into()],
                before_sha256: Some("aa".into()),
                after_sha256: Some("bb".into()),
                error: None,
            }],
        });
        report.summary.files_modified = 1;
        report.summary.fixes_applied = 2;

        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.passes.len(), 1);
        assert_eq!(back.passes[0].files[0].fixes, 2);
        assert_eq!(back.summary.files_modified, 1);
    }

    #[test]
    fn skipped_pass_serializes_reason() {
        let outcome = PassOutcome {
            pass: PassId::new("tree.rename_vendor_all"),
            safety: SafetyClass::Unsafe,
            status: PassStatus::Skipped,
            reason: Some("unsafe passes require --allow-unsafe".into()),
            files: vec![],
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("allow-unsafe"));
        assert!(json.contains("\"skipped\""));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let outcome = FileOutcome {
            path: "BUILD.gn".into(),
            status: FileStatus::Unchanged,
            fixes: 0,
            subjects: vec![],
            before_sha256: None,
            after_sha256: None,
            error: None,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("sha256"));
        assert!(!json.contains("error"));
        assert!(!json.contains("subjects"));
    }
}
