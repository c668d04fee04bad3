//! Domain entities of the contest hierarchy.
//!
//! `Contest` exclusively owns its `rounds`, a `Round` its `problems`, a
//! `Problem` its `test_cases`; a child never exists outside its parent's
//! list, so deleting a parent drops the whole subtree by construction.
//! `Team`, `School` and `Appeal` are flat, top-level collections.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field-level validation outcome; empty means valid. Returned as data,
/// never as an `Err`.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub const REQUIRED: &str = "required";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    #[default]
    Draft,
    Published,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: i32,
    pub year: i32,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub status: ContestStatus,
    pub created_at: DateTime<Utc>,
    pub rounds: Vec<Round>,
}

/// Client-supplied contest fields; `id`, `created_at` and `rounds` are
/// server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestData {
    pub year: i32,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub status: ContestStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Unique within the parent contest only.
    pub id: i32,
    pub contest_id: i32,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub problems: Vec<Problem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundData {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    Manual,
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Unique within the parent round only.
    pub id: i32,
    pub round_id: i32,
    pub language: String,
    pub kind: ProblemKind,
    pub penalty_rate: f64,
    pub created_at: DateTime<Utc>,
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemData {
    pub language: String,
    pub kind: ProblemKind,
    pub penalty_rate: f64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TestCaseKind {
    Public,
    #[default]
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Unique within the parent problem only.
    pub id: i32,
    pub problem_id: i32,
    pub description: String,
    pub kind: TestCaseKind,
    pub weight: f64,
    pub time_limit_ms: i64,
    pub memory_kb: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseData {
    pub description: String,
    pub kind: TestCaseKind,
    pub weight: f64,
    pub time_limit_ms: i64,
    pub memory_kb: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i32,
    pub name: String,
    pub school_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamData {
    pub name: String,
    pub school_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolData {
    pub name: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AppealStatus {
    #[default]
    Open,
    Resolved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appeal {
    pub id: i32,
    pub team_id: i32,
    pub subject: String,
    pub status: AppealStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealData {
    pub team_id: i32,
    pub subject: String,
    pub status: AppealStatus,
}
