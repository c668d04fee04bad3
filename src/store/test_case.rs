use leptos::*;

use super::StoreState;
use crate::{api::*, error::*, model::*};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TestCaseForm {
    pub description: String,
    pub kind: TestCaseKind,
    pub weight: String,
    pub time_limit_ms: String,
    pub memory_kb: String,
}

fn positive_int(
    raw: &str,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, REQUIRED.to_owned());
        return None;
    }
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Some(value),
        Ok(_) => {
            errors.insert(field, "must be positive".to_owned());
            None
        }
        Err(_) => {
            errors.insert(field, "invalid number".to_owned());
            None
        }
    }
}

impl TestCaseForm {
    pub fn validate(&self) -> FieldErrors {
        self.parse().err().unwrap_or_default()
    }

    pub fn parse(&self) -> Result<TestCaseData, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.description.trim().is_empty() {
            errors.insert("description", REQUIRED.to_owned());
        }
        let weight = if self.weight.trim().is_empty() {
            errors.insert("weight", REQUIRED.to_owned());
            None
        } else {
            match self.weight.trim().parse::<f64>() {
                Ok(weight) if weight > 0.0 => Some(weight),
                Ok(_) => {
                    errors.insert("weight", "must be positive".to_owned());
                    None
                }
                Err(_) => {
                    errors.insert("weight", "invalid number".to_owned());
                    None
                }
            }
        };
        let time_limit_ms =
            positive_int(&self.time_limit_ms, "timeLimitMs", &mut errors);
        let memory_kb = positive_int(&self.memory_kb, "memoryKb", &mut errors);
        match (weight, time_limit_ms, memory_kb) {
            (Some(weight), Some(time_limit_ms), Some(memory_kb))
                if errors.is_empty() =>
            {
                Ok(TestCaseData {
                    description: self.description.trim().to_owned(),
                    kind: self.kind,
                    weight,
                    time_limit_ms,
                    memory_kb,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Test cases of one problem; the full ancestor chain is fixed at
/// construction.
#[derive(Clone)]
pub struct TestCaseStore<B: Backend> {
    backend: B,
    contest_id: i32,
    round_id: i32,
    problem_id: i32,
    state: StoreState<TestCase>,
}

impl<B: Backend> TestCaseStore<B> {
    pub fn new(
        backend: B,
        contest_id: i32,
        round_id: i32,
        problem_id: i32,
    ) -> Self {
        Self {
            backend,
            contest_id,
            round_id,
            problem_id,
            state: StoreState::new(),
        }
    }

    pub fn data(&self) -> RwSignal<Vec<TestCase>> {
        self.state.data
    }

    pub fn loading(&self) -> RwSignal<bool> {
        self.state.loading
    }

    pub fn error(&self) -> RwSignal<Option<Error>> {
        self.state.error
    }

    pub async fn load(&self) -> Result<()> {
        let cases = self
            .state
            .run(self.backend.list_test_cases(
                self.contest_id,
                self.round_id,
                self.problem_id,
            ))
            .await?;
        self.state.data.set(cases);
        Ok(())
    }

    pub async fn add(&self, data: TestCaseData) -> Result<TestCase> {
        let case = self
            .state
            .run(self.backend.add_test_case(
                self.contest_id,
                self.round_id,
                self.problem_id,
                data,
            ))
            .await?;
        self.state.append(case.clone());
        Ok(case)
    }

    pub async fn update(
        &self,
        test_case: i32,
        data: TestCaseData,
    ) -> Result<TestCase> {
        let updated = self
            .state
            .run(self.backend.update_test_case(
                self.contest_id,
                self.round_id,
                self.problem_id,
                test_case,
                data,
            ))
            .await?;
        self.state.replace(updated.clone(), |t| t.id);
        Ok(updated)
    }

    pub async fn remove(&self, test_case: i32) -> Result<TestCase> {
        let removed = self
            .state
            .run(self.backend.remove_test_case(
                self.contest_id,
                self.round_id,
                self.problem_id,
                test_case,
            ))
            .await?;
        self.state.remove_local(removed.id, |t| t.id);
        Ok(removed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repo::MockRepo;

    fn form() -> TestCaseForm {
        TestCaseForm {
            description: "sample".to_owned(),
            kind: TestCaseKind::Public,
            weight: "1.5".to_owned(),
            time_limit_ms: "1000".to_owned(),
            memory_kb: "262144".to_owned(),
        }
    }

    #[test]
    fn validate_limits() {
        let mut bad = form();
        bad.weight = "0".to_owned();
        bad.time_limit_ms = "-5".to_owned();
        bad.memory_kb = "lots".to_owned();
        let errors = bad.validate();
        assert_eq!(
            errors.get("weight").map(String::as_str),
            Some("must be positive")
        );
        assert_eq!(
            errors.get("timeLimitMs").map(String::as_str),
            Some("must be positive")
        );
        assert_eq!(
            errors.get("memoryKb").map(String::as_str),
            Some("invalid number")
        );
        assert!(form().validate().is_empty());
    }

    async fn parents(repo: &MockRepo) -> (i32, i32, i32) {
        let contest = repo
            .add_contest(ContestData {
                year: 2025,
                name: "Nationals".to_owned(),
                description: String::new(),
                image_url: None,
                status: ContestStatus::Draft,
            })
            .await
            .unwrap();
        let round = repo
            .add_round(
                contest.id,
                RoundData {
                    name: "Final".to_owned(),
                    start: "2025-10-15T09:00:00Z".parse().unwrap(),
                    end: "2025-10-15T12:00:00Z".parse().unwrap(),
                },
            )
            .await
            .unwrap();
        let problem = repo
            .add_problem(
                contest.id,
                round.id,
                ProblemData {
                    language: "rust".to_owned(),
                    kind: ProblemKind::Auto,
                    penalty_rate: 0.0,
                },
            )
            .await
            .unwrap();
        (contest.id, round.id, problem.id)
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let rt = create_runtime();
        let repo = MockRepo::new();
        let (contest, round, problem) = parents(&repo).await;
        let store = TestCaseStore::new(repo.clone(), contest, round, problem);

        let case = store.add(form().parse().unwrap()).await.unwrap();
        assert_eq!(case.problem_id, problem);
        assert_eq!(store.data().get_untracked().len(), 1);

        let mut data = form().parse().unwrap();
        data.kind = TestCaseKind::Hidden;
        store.update(case.id, data).await.unwrap();
        assert_eq!(
            store.data().get_untracked()[0].kind,
            TestCaseKind::Hidden
        );

        store.remove(case.id).await.unwrap();
        assert!(store.data().get_untracked().is_empty());
        rt.dispose();
    }
}
