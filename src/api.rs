//! JSON wire contract shared with the backend REST service, and the
//! [`Backend`] seam both the real client and the in-memory repository
//! implement.

use serde::{Deserialize, Serialize};

use crate::{error::*, model::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginate {
    pub page_number: u32,
    pub page_size: u32,
}

impl Paginate {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }
}

impl Default for Paginate {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 20,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_pages: u32,
    pub current_page: u32,
    pub total_items: u64,
}

/// `{data, additionalData}` shape of every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub additional_data: PageInfo,
}

/// `{data}` shape of every single-entity endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Structured error body of a rejected mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: String,
    pub error_message: String,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl From<ErrorBody> for Error {
    fn from(body: ErrorBody) -> Self {
        let kind = match body.error_code.as_str() {
            "NOT_FOUND" => ErrorKind::NotFound,
            "RATE_LIMIT" => ErrorKind::RateLimit,
            "UNAUTHENTICATED" => ErrorKind::Unauthenticated,
            "PERMISSION_DENIED" => ErrorKind::PermissionDenied,
            "NETWORK" => ErrorKind::Network,
            code => {
                tracing::error!(code, "unknown backend error code");
                ErrorKind::Internal
            }
        };
        Error::new(kind, body.error_message)
    }
}

/// Subtree removed alongside a parent entity. Cascade is reported
/// explicitly instead of being implied by array ownership.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub rounds: usize,
    pub problems: usize,
    pub test_cases: usize,
}

impl CascadeReport {
    pub fn of_contest(contest: &Contest) -> Self {
        Self::of_rounds(&contest.rounds)
    }

    fn of_rounds(rounds: &[Round]) -> Self {
        let mut report = Self {
            rounds: rounds.len(),
            ..Self::default()
        };
        for round in rounds {
            report.problems += round.problems.len();
            for problem in &round.problems {
                report.test_cases += problem.test_cases.len();
            }
        }
        report
    }

    pub fn of_round(round: &Round) -> Self {
        Self {
            rounds: 0,
            problems: round.problems.len(),
            test_cases: round
                .problems
                .iter()
                .map(|p| p.test_cases.len())
                .sum(),
        }
    }

    pub fn of_problem(problem: &Problem) -> Self {
        Self {
            test_cases: problem.test_cases.len(),
            ..Self::default()
        }
    }
}

/// A removed entity together with the cascade it took down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Removed<T> {
    pub entity: T,
    pub cascade: CascadeReport,
}

/// Authorization header value for the REST collaborator.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Uniform facade over the contest backend.
///
/// Nested operations take the full ancestor chain and fail `NotFound` at
/// whichever level breaks. Updates are last-write-wins; there is no
/// version or ETag check.
#[allow(async_fn_in_trait)]
pub trait Backend: Clone + 'static {
    async fn list_contests(
        &self,
        page: Paginate,
    ) -> Result<ListEnvelope<Contest>>;
    async fn get_contest(&self, contest: i32) -> Result<Contest>;
    async fn add_contest(&self, data: ContestData) -> Result<Contest>;
    async fn update_contest(
        &self,
        contest: i32,
        data: ContestData,
    ) -> Result<Contest>;
    async fn remove_contest(&self, contest: i32) -> Result<Removed<Contest>>;

    async fn list_rounds(&self, contest: i32) -> Result<Vec<Round>>;
    async fn get_round(&self, contest: i32, round: i32) -> Result<Round>;
    async fn add_round(&self, contest: i32, data: RoundData)
        -> Result<Round>;
    async fn update_round(
        &self,
        contest: i32,
        round: i32,
        data: RoundData,
    ) -> Result<Round>;
    async fn remove_round(
        &self,
        contest: i32,
        round: i32,
    ) -> Result<Removed<Round>>;

    async fn list_problems(
        &self,
        contest: i32,
        round: i32,
    ) -> Result<Vec<Problem>>;
    async fn get_problem(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
    ) -> Result<Problem>;
    async fn add_problem(
        &self,
        contest: i32,
        round: i32,
        data: ProblemData,
    ) -> Result<Problem>;
    async fn update_problem(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        data: ProblemData,
    ) -> Result<Problem>;
    async fn remove_problem(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
    ) -> Result<Removed<Problem>>;

    async fn list_test_cases(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
    ) -> Result<Vec<TestCase>>;
    async fn get_test_case(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        test_case: i32,
    ) -> Result<TestCase>;
    async fn add_test_case(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        data: TestCaseData,
    ) -> Result<TestCase>;
    async fn update_test_case(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        test_case: i32,
        data: TestCaseData,
    ) -> Result<TestCase>;
    async fn remove_test_case(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        test_case: i32,
    ) -> Result<TestCase>;

    async fn list_teams(&self, page: Paginate) -> Result<ListEnvelope<Team>>;
    async fn get_team(&self, team: i32) -> Result<Team>;
    async fn add_team(&self, data: TeamData) -> Result<Team>;
    async fn update_team(&self, team: i32, data: TeamData) -> Result<Team>;
    async fn remove_team(&self, team: i32) -> Result<Team>;

    async fn list_schools(&self) -> Result<Vec<School>>;
    async fn get_school(&self, school: i32) -> Result<School>;
    async fn add_school(&self, data: SchoolData) -> Result<School>;
    async fn update_school(
        &self,
        school: i32,
        data: SchoolData,
    ) -> Result<School>;
    async fn remove_school(&self, school: i32) -> Result<School>;

    async fn list_appeals(&self) -> Result<Vec<Appeal>>;
    async fn get_appeal(&self, appeal: i32) -> Result<Appeal>;
    async fn add_appeal(&self, data: AppealData) -> Result<Appeal>;
    async fn update_appeal(
        &self,
        appeal: i32,
        data: AppealData,
    ) -> Result<Appeal>;
    async fn remove_appeal(&self, appeal: i32) -> Result<Appeal>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_body_mapping() {
        let body = ErrorBody {
            error_code: "NOT_FOUND".to_owned(),
            error_message: "contest 3".to_owned(),
            errors: vec![],
        };
        let err: Error = body.into();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.context, "contest 3");
    }

    #[test]
    fn unknown_error_code_is_internal() {
        let body = ErrorBody {
            error_code: "TEAPOT".to_owned(),
            error_message: "short and stout".to_owned(),
            errors: vec![],
        };
        assert_eq!(Error::from(body).kind, ErrorKind::Internal);
    }

    #[test]
    fn envelope_wire_shape() {
        let raw = r#"{"data":[],"additionalData":{"totalPages":3,"currentPage":1,"totalItems":41}}"#;
        let env: ListEnvelope<Contest> = serde_json::from_str(raw).unwrap();
        assert_eq!(env.additional_data.total_pages, 3);
        assert_eq!(env.additional_data.total_items, 41);
    }

    #[test]
    fn single_entity_envelope() {
        let raw = r#"{"data":{"id":1,"name":"MIT"}}"#;
        let env: OneEnvelope<School> = serde_json::from_str(raw).unwrap();
        assert_eq!(env.data.name, "MIT");
    }

    #[test]
    fn bearer_header() {
        assert_eq!(bearer("abc"), "Bearer abc");
    }
}
