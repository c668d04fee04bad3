use leptos::*;

use super::StoreState;
use crate::{api::*, error::*, model::*};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProblemForm {
    pub language: String,
    pub kind: ProblemKind,
    pub penalty_rate: String,
}

impl ProblemForm {
    pub fn validate(&self) -> FieldErrors {
        self.parse().err().unwrap_or_default()
    }

    pub fn parse(&self) -> Result<ProblemData, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.language.trim().is_empty() {
            errors.insert("language", REQUIRED.to_owned());
        }
        let penalty_rate = if self.penalty_rate.trim().is_empty() {
            errors.insert("penaltyRate", REQUIRED.to_owned());
            None
        } else {
            match self.penalty_rate.trim().parse::<f64>() {
                Ok(rate) if rate >= 0.0 => Some(rate),
                Ok(_) => {
                    errors.insert(
                        "penaltyRate",
                        "must not be negative".to_owned(),
                    );
                    None
                }
                Err(_) => {
                    errors.insert("penaltyRate", "invalid number".to_owned());
                    None
                }
            }
        };
        match penalty_rate {
            Some(penalty_rate) if errors.is_empty() => Ok(ProblemData {
                language: self.language.trim().to_owned(),
                kind: self.kind,
                penalty_rate,
            }),
            _ => Err(errors),
        }
    }
}

/// Problems of one round; both ancestor ids are fixed at construction.
#[derive(Clone)]
pub struct ProblemStore<B: Backend> {
    backend: B,
    contest_id: i32,
    round_id: i32,
    state: StoreState<Problem>,
}

impl<B: Backend> ProblemStore<B> {
    pub fn new(backend: B, contest_id: i32, round_id: i32) -> Self {
        Self {
            backend,
            contest_id,
            round_id,
            state: StoreState::new(),
        }
    }

    pub fn data(&self) -> RwSignal<Vec<Problem>> {
        self.state.data
    }

    pub fn loading(&self) -> RwSignal<bool> {
        self.state.loading
    }

    pub fn error(&self) -> RwSignal<Option<Error>> {
        self.state.error
    }

    pub async fn load(&self) -> Result<()> {
        let problems = self
            .state
            .run(self.backend.list_problems(self.contest_id, self.round_id))
            .await?;
        self.state.data.set(problems);
        Ok(())
    }

    pub async fn add(&self, data: ProblemData) -> Result<Problem> {
        let problem = self
            .state
            .run(self.backend.add_problem(self.contest_id, self.round_id, data))
            .await?;
        self.state.append(problem.clone());
        Ok(problem)
    }

    pub async fn update(
        &self,
        problem: i32,
        data: ProblemData,
    ) -> Result<Problem> {
        let updated = self
            .state
            .run(self.backend.update_problem(
                self.contest_id,
                self.round_id,
                problem,
                data,
            ))
            .await?;
        self.state.replace(updated.clone(), |p| p.id);
        Ok(updated)
    }

    pub async fn remove(&self, problem: i32) -> Result<Removed<Problem>> {
        let removed = self
            .state
            .run(self.backend.remove_problem(
                self.contest_id,
                self.round_id,
                problem,
            ))
            .await?;
        self.state.remove_local(removed.entity.id, |p| p.id);
        Ok(removed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repo::MockRepo;

    fn form() -> ProblemForm {
        ProblemForm {
            language: "rust".to_owned(),
            kind: ProblemKind::Auto,
            penalty_rate: "0.25".to_owned(),
        }
    }

    #[test]
    fn validate_penalty_rate() {
        let mut bad = form();
        bad.penalty_rate = "-1".to_owned();
        assert_eq!(
            bad.validate().get("penaltyRate").map(String::as_str),
            Some("must not be negative")
        );

        bad.penalty_rate = "free".to_owned();
        assert_eq!(
            bad.validate().get("penaltyRate").map(String::as_str),
            Some("invalid number")
        );

        bad.penalty_rate = String::new();
        assert_eq!(
            bad.validate().get("penaltyRate").map(String::as_str),
            Some(REQUIRED)
        );

        // zero penalty is a valid rate
        let mut zero = form();
        zero.penalty_rate = "0".to_owned();
        assert!(zero.validate().is_empty());
    }

    async fn parents(repo: &MockRepo) -> (i32, i32) {
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
        (contest.id, round.id)
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let rt = create_runtime();
        let repo = MockRepo::new();
        let (contest, round) = parents(&repo).await;
        let store = ProblemStore::new(repo.clone(), contest, round);

        let problem = store.add(form().parse().unwrap()).await.unwrap();
        assert_eq!(problem.round_id, round);

        let mut data = form().parse().unwrap();
        data.kind = ProblemKind::Manual;
        store.update(problem.id, data).await.unwrap();
        assert_eq!(
            store.data().get_untracked()[0].kind,
            ProblemKind::Manual
        );

        store.remove(problem.id).await.unwrap();
        assert!(store.data().get_untracked().is_empty());
        rt.dispose();
    }

    #[tokio::test]
    async fn load_requires_ancestor_chain() {
        let rt = create_runtime();
        let repo = MockRepo::new();
        let (contest, _) = parents(&repo).await;
        // wrong round under an existing contest
        let store = ProblemStore::new(repo, contest, 99);
        let err = store.load().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.context.contains("round 99"));
        rt.dispose();
    }
}
