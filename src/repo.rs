//! In-memory repository standing in for the backend during development.
//!
//! State lives behind `Rc<RefCell<_>>`: clones share the same tree, the
//! way every page of the real app shares one backend. Execution is a
//! single logical thread, so each mutation completes atomically; two
//! asynchronous mutations started close together still race
//! sequentially and the last write wins.

use std::{cell::RefCell, rc::Rc};

use chrono::Utc;

use crate::{api::*, error::*, model::*};

#[derive(Debug, Default)]
struct RepoState {
    contests: Vec<Contest>,
    teams: Vec<Team>,
    schools: Vec<School>,
    appeals: Vec<Appeal>,
}

#[derive(Debug, Clone, Default)]
pub struct MockRepo {
    state: Rc<RefCell<RepoState>>,
    latency_ms: u32,
}

/// `max(sibling id) + 1`, starting at 1. Monotonic within one parent
/// scope only; not collision-safe under concurrent writers.
fn next_id<T>(siblings: &[T], id: impl Fn(&T) -> i32) -> i32 {
    siblings.iter().map(id).max().map_or(1, |max| max + 1)
}

fn paginate<T: Clone>(items: &[T], page: Paginate) -> ListEnvelope<T> {
    let page_size = page.page_size.max(1) as usize;
    let page_number = page.page_number.max(1);
    let start = (page_number as usize - 1) * page_size;
    ListEnvelope {
        data: items.iter().skip(start).take(page_size).cloned().collect(),
        additional_data: PageInfo {
            total_pages: items.len().div_ceil(page_size) as u32,
            current_page: page_number,
            total_items: items.len() as u64,
        },
    }
}

impl RepoState {
    fn contest_mut(&mut self, contest: i32) -> Result<&mut Contest> {
        self.contests
            .iter_mut()
            .find(|c| c.id == contest)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!("contest {contest}"))
            })
    }

    fn round_mut(&mut self, contest: i32, round: i32) -> Result<&mut Round> {
        self.contest_mut(contest)?
            .rounds
            .iter_mut()
            .find(|r| r.id == round)
            .ok_or_else(|| {
                ErrorKind::NotFound
                    .context(format!("round {round} in contest {contest}"))
            })
    }

    fn problem_mut(
        &mut self,
        contest: i32,
        round: i32,
        problem: i32,
    ) -> Result<&mut Problem> {
        self.round_mut(contest, round)?
            .problems
            .iter_mut()
            .find(|p| p.id == problem)
            .ok_or_else(|| {
                ErrorKind::NotFound
                    .context(format!("problem {problem} in round {round}"))
            })
    }

    fn team_mut(&mut self, team: i32) -> Result<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == team).ok_or_else(|| {
            ErrorKind::NotFound.context(format!("team {team}"))
        })
    }

    fn appeal_mut(&mut self, appeal: i32) -> Result<&mut Appeal> {
        self.appeals
            .iter_mut()
            .find(|a| a.id == appeal)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!("appeal {appeal}"))
            })
    }
}

impl MockRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`crate::config::Config::mock_latency_ms`].
    pub fn with_latency(latency_ms: u32) -> Self {
        Self {
            latency_ms,
            ..Self::default()
        }
    }

    /// Mimic a network round trip. Wasm only; native callers (tests)
    /// resolve immediately.
    async fn roundtrip(&self) {
        #[cfg(target_arch = "wasm32")]
        if self.latency_ms > 0 {
            gloo::timers::future::TimeoutFuture::new(self.latency_ms).await;
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = self.latency_ms;
    }
}

impl Backend for MockRepo {
    async fn list_contests(
        &self,
        page: Paginate,
    ) -> Result<ListEnvelope<Contest>> {
        self.roundtrip().await;
        Ok(paginate(&self.state.borrow().contests, page))
    }

    async fn get_contest(&self, contest: i32) -> Result<Contest> {
        self.roundtrip().await;
        self.state.borrow_mut().contest_mut(contest).cloned()
    }

    async fn add_contest(&self, data: ContestData) -> Result<Contest> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let contest = Contest {
            id: next_id(&state.contests, |c| c.id),
            year: data.year,
            name: data.name,
            description: data.description,
            image_url: data.image_url,
            status: data.status,
            created_at: Utc::now(),
            rounds: vec![],
        };
        tracing::info!(contest = contest.id, "created contest");
        state.contests.push(contest.clone());
        Ok(contest)
    }

    async fn update_contest(
        &self,
        contest: i32,
        data: ContestData,
    ) -> Result<Contest> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let target = state.contest_mut(contest)?;
        target.year = data.year;
        target.name = data.name;
        target.description = data.description;
        target.image_url = data.image_url;
        target.status = data.status;
        Ok(target.clone())
    }

    async fn remove_contest(&self, contest: i32) -> Result<Removed<Contest>> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let index = state
            .contests
            .iter()
            .position(|c| c.id == contest)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!("contest {contest}"))
            })?;
        let entity = state.contests.remove(index);
        let cascade = CascadeReport::of_contest(&entity);
        tracing::info!(
            contest,
            rounds = cascade.rounds,
            problems = cascade.problems,
            test_cases = cascade.test_cases,
            "removed contest and its subtree"
        );
        Ok(Removed { entity, cascade })
    }

    async fn list_rounds(&self, contest: i32) -> Result<Vec<Round>> {
        self.roundtrip().await;
        Ok(self.state.borrow_mut().contest_mut(contest)?.rounds.clone())
    }

    async fn get_round(&self, contest: i32, round: i32) -> Result<Round> {
        self.roundtrip().await;
        self.state.borrow_mut().round_mut(contest, round).cloned()
    }

    async fn add_round(
        &self,
        contest: i32,
        data: RoundData,
    ) -> Result<Round> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let parent = state.contest_mut(contest)?;
        let round = Round {
            id: next_id(&parent.rounds, |r| r.id),
            contest_id: contest,
            name: data.name,
            start: data.start,
            end: data.end,
            problems: vec![],
        };
        tracing::info!(contest, round = round.id, "created round");
        parent.rounds.push(round.clone());
        Ok(round)
    }

    async fn update_round(
        &self,
        contest: i32,
        round: i32,
        data: RoundData,
    ) -> Result<Round> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let target = state.round_mut(contest, round)?;
        target.name = data.name;
        target.start = data.start;
        target.end = data.end;
        Ok(target.clone())
    }

    async fn remove_round(
        &self,
        contest: i32,
        round: i32,
    ) -> Result<Removed<Round>> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let parent = state.contest_mut(contest)?;
        let index = parent
            .rounds
            .iter()
            .position(|r| r.id == round)
            .ok_or_else(|| {
                ErrorKind::NotFound
                    .context(format!("round {round} in contest {contest}"))
            })?;
        let entity = parent.rounds.remove(index);
        let cascade = CascadeReport::of_round(&entity);
        tracing::info!(
            contest,
            round,
            problems = cascade.problems,
            test_cases = cascade.test_cases,
            "removed round and its subtree"
        );
        Ok(Removed { entity, cascade })
    }

    async fn list_problems(
        &self,
        contest: i32,
        round: i32,
    ) -> Result<Vec<Problem>> {
        self.roundtrip().await;
        Ok(self
            .state
            .borrow_mut()
            .round_mut(contest, round)?
            .problems
            .clone())
    }

    async fn get_problem(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
    ) -> Result<Problem> {
        self.roundtrip().await;
        self.state
            .borrow_mut()
            .problem_mut(contest, round, problem)
            .cloned()
    }

    async fn add_problem(
        &self,
        contest: i32,
        round: i32,
        data: ProblemData,
    ) -> Result<Problem> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let parent = state.round_mut(contest, round)?;
        let problem = Problem {
            id: next_id(&parent.problems, |p| p.id),
            round_id: round,
            language: data.language,
            kind: data.kind,
            penalty_rate: data.penalty_rate,
            created_at: Utc::now(),
            test_cases: vec![],
        };
        tracing::info!(contest, round, problem = problem.id, "created problem");
        parent.problems.push(problem.clone());
        Ok(problem)
    }

    async fn update_problem(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        data: ProblemData,
    ) -> Result<Problem> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let target = state.problem_mut(contest, round, problem)?;
        target.language = data.language;
        target.kind = data.kind;
        target.penalty_rate = data.penalty_rate;
        Ok(target.clone())
    }

    async fn remove_problem(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
    ) -> Result<Removed<Problem>> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let parent = state.round_mut(contest, round)?;
        let index = parent
            .problems
            .iter()
            .position(|p| p.id == problem)
            .ok_or_else(|| {
                ErrorKind::NotFound
                    .context(format!("problem {problem} in round {round}"))
            })?;
        let entity = parent.problems.remove(index);
        let cascade = CascadeReport::of_problem(&entity);
        tracing::info!(
            contest,
            round,
            problem,
            test_cases = cascade.test_cases,
            "removed problem and its test cases"
        );
        Ok(Removed { entity, cascade })
    }

    async fn list_test_cases(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
    ) -> Result<Vec<TestCase>> {
        self.roundtrip().await;
        Ok(self
            .state
            .borrow_mut()
            .problem_mut(contest, round, problem)?
            .test_cases
            .clone())
    }

    async fn get_test_case(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        test_case: i32,
    ) -> Result<TestCase> {
        self.roundtrip().await;
        self.state
            .borrow_mut()
            .problem_mut(contest, round, problem)?
            .test_cases
            .iter()
            .find(|t| t.id == test_case)
            .cloned()
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!(
                    "test case {test_case} in problem {problem}"
                ))
            })
    }

    async fn add_test_case(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        data: TestCaseData,
    ) -> Result<TestCase> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let parent = state.problem_mut(contest, round, problem)?;
        let test_case = TestCase {
            id: next_id(&parent.test_cases, |t| t.id),
            problem_id: problem,
            description: data.description,
            kind: data.kind,
            weight: data.weight,
            time_limit_ms: data.time_limit_ms,
            memory_kb: data.memory_kb,
        };
        tracing::info!(
            contest,
            round,
            problem,
            test_case = test_case.id,
            "created test case"
        );
        parent.test_cases.push(test_case.clone());
        Ok(test_case)
    }

    async fn update_test_case(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        test_case: i32,
        data: TestCaseData,
    ) -> Result<TestCase> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let parent = state.problem_mut(contest, round, problem)?;
        let target = parent
            .test_cases
            .iter_mut()
            .find(|t| t.id == test_case)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!(
                    "test case {test_case} in problem {problem}"
                ))
            })?;
        target.description = data.description;
        target.kind = data.kind;
        target.weight = data.weight;
        target.time_limit_ms = data.time_limit_ms;
        target.memory_kb = data.memory_kb;
        Ok(target.clone())
    }

    async fn remove_test_case(
        &self,
        contest: i32,
        round: i32,
        problem: i32,
        test_case: i32,
    ) -> Result<TestCase> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let parent = state.problem_mut(contest, round, problem)?;
        let index = parent
            .test_cases
            .iter()
            .position(|t| t.id == test_case)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!(
                    "test case {test_case} in problem {problem}"
                ))
            })?;
        tracing::info!(contest, round, problem, test_case, "removed test case");
        Ok(parent.test_cases.remove(index))
    }

    async fn list_teams(&self, page: Paginate) -> Result<ListEnvelope<Team>> {
        self.roundtrip().await;
        Ok(paginate(&self.state.borrow().teams, page))
    }

    async fn get_team(&self, team: i32) -> Result<Team> {
        self.roundtrip().await;
        self.state.borrow_mut().team_mut(team).cloned()
    }

    async fn add_team(&self, data: TeamData) -> Result<Team> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let team = Team {
            id: next_id(&state.teams, |t| t.id),
            name: data.name,
            school_id: data.school_id,
            created_at: Utc::now(),
        };
        tracing::info!(team = team.id, "created team");
        state.teams.push(team.clone());
        Ok(team)
    }

    async fn update_team(&self, team: i32, data: TeamData) -> Result<Team> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let target = state.team_mut(team)?;
        target.name = data.name;
        target.school_id = data.school_id;
        Ok(target.clone())
    }

    async fn remove_team(&self, team: i32) -> Result<Team> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let index = state
            .teams
            .iter()
            .position(|t| t.id == team)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!("team {team}"))
            })?;
        tracing::info!(team, "removed team");
        Ok(state.teams.remove(index))
    }

    async fn list_schools(&self) -> Result<Vec<School>> {
        self.roundtrip().await;
        Ok(self.state.borrow().schools.clone())
    }

    async fn get_school(&self, school: i32) -> Result<School> {
        self.roundtrip().await;
        self.state
            .borrow()
            .schools
            .iter()
            .find(|s| s.id == school)
            .cloned()
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!("school {school}"))
            })
    }

    async fn add_school(&self, data: SchoolData) -> Result<School> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let school = School {
            id: next_id(&state.schools, |s| s.id),
            name: data.name,
        };
        tracing::info!(school = school.id, "created school");
        state.schools.push(school.clone());
        Ok(school)
    }

    async fn update_school(
        &self,
        school: i32,
        data: SchoolData,
    ) -> Result<School> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let target = state
            .schools
            .iter_mut()
            .find(|s| s.id == school)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!("school {school}"))
            })?;
        target.name = data.name;
        Ok(target.clone())
    }

    async fn remove_school(&self, school: i32) -> Result<School> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let index = state
            .schools
            .iter()
            .position(|s| s.id == school)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!("school {school}"))
            })?;
        tracing::info!(school, "removed school");
        Ok(state.schools.remove(index))
    }

    async fn list_appeals(&self) -> Result<Vec<Appeal>> {
        self.roundtrip().await;
        Ok(self.state.borrow().appeals.clone())
    }

    async fn get_appeal(&self, appeal: i32) -> Result<Appeal> {
        self.roundtrip().await;
        self.state.borrow_mut().appeal_mut(appeal).cloned()
    }

    async fn add_appeal(&self, data: AppealData) -> Result<Appeal> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let appeal = Appeal {
            id: next_id(&state.appeals, |a| a.id),
            team_id: data.team_id,
            subject: data.subject,
            status: data.status,
            created_at: Utc::now(),
        };
        tracing::info!(appeal = appeal.id, "created appeal");
        state.appeals.push(appeal.clone());
        Ok(appeal)
    }

    async fn update_appeal(
        &self,
        appeal: i32,
        data: AppealData,
    ) -> Result<Appeal> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let target = state.appeal_mut(appeal)?;
        target.team_id = data.team_id;
        target.subject = data.subject;
        target.status = data.status;
        Ok(target.clone())
    }

    async fn remove_appeal(&self, appeal: i32) -> Result<Appeal> {
        self.roundtrip().await;
        let mut state = self.state.borrow_mut();
        let index = state
            .appeals
            .iter()
            .position(|a| a.id == appeal)
            .ok_or_else(|| {
                ErrorKind::NotFound.context(format!("appeal {appeal}"))
            })?;
        tracing::info!(appeal, "removed appeal");
        Ok(state.appeals.remove(index))
    }
}
