//! Breadcrumb resolution: route parameters in, `{labels, paths}` out.
//!
//! A page names its own [`PageKind`] variant, which carries exactly the
//! ids that page can have. Lookups cross-reference the entity
//! collections; anything missing or malformed degrades to a fixed
//! placeholder label. Breadcrumbs never fail a page render.

use leptos::*;
use leptos_router::ParamsMap;

use crate::model::*;

pub const UNKNOWN_CONTEST: &str = "Unknown Contest";
pub const UNKNOWN_ROUND: &str = "Unknown Round";
pub const UNKNOWN_PROBLEM: &str = "Unknown Problem";
pub const UNKNOWN_TEAM: &str = "Unknown Team";
pub const UNKNOWN_APPEAL: &str = "Unknown Appeal";

/// A route identifier as it came off the URL. A malformed id parses to
/// `None` and behaves exactly like a well-formed id that matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteId {
    raw: String,
    id: Option<i32>,
}

impl RouteId {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let id = raw.trim().parse().ok();
        Self { raw, id }
    }

    pub fn from_params(map: &ParamsMap, key: &str) -> Self {
        Self::parse(map.get(key).cloned().unwrap_or_default())
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl From<i32> for RouteId {
    fn from(id: i32) -> Self {
        Self {
            raw: id.to_string(),
            id: Some(id),
        }
    }
}

/// One variant per page, carrying only the ids that page's route has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Dashboard,
    Contests,
    Contest {
        contest: RouteId,
    },
    Round {
        contest: RouteId,
        round: RouteId,
    },
    Problem {
        contest: RouteId,
        round: RouteId,
        problem: RouteId,
    },
    TestCases {
        contest: RouteId,
        round: RouteId,
        problem: RouteId,
    },
    Teams,
    Team {
        team: RouteId,
    },
    Appeals,
    Appeal {
        appeal: RouteId,
    },
    Judges,
    Certificates,
}

impl PageKind {
    pub fn contest(map: &ParamsMap) -> Self {
        Self::Contest {
            contest: RouteId::from_params(map, "contest"),
        }
    }

    pub fn round(map: &ParamsMap) -> Self {
        Self::Round {
            contest: RouteId::from_params(map, "contest"),
            round: RouteId::from_params(map, "round"),
        }
    }

    pub fn problem(map: &ParamsMap) -> Self {
        Self::Problem {
            contest: RouteId::from_params(map, "contest"),
            round: RouteId::from_params(map, "round"),
            problem: RouteId::from_params(map, "problem"),
        }
    }

    pub fn test_cases(map: &ParamsMap) -> Self {
        Self::TestCases {
            contest: RouteId::from_params(map, "contest"),
            round: RouteId::from_params(map, "round"),
            problem: RouteId::from_params(map, "problem"),
        }
    }

    pub fn team(map: &ParamsMap) -> Self {
        Self::Team {
            team: RouteId::from_params(map, "team"),
        }
    }

    pub fn appeal(map: &ParamsMap) -> Self {
        Self::Appeal {
            appeal: RouteId::from_params(map, "appeal"),
        }
    }
}

/// Labels and their clickable targets, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    pub labels: Vec<String>,
    pub paths: Vec<String>,
}

impl Trail {
    fn push(&mut self, label: impl Into<String>, path: impl Into<String>) {
        self.labels.push(label.into());
        self.paths.push(path.into());
    }
}

#[derive(Clone)]
pub struct BreadcrumbResolver {
    contests: Signal<Vec<Contest>>,
    teams: Signal<Vec<Team>>,
    appeals: Signal<Vec<Appeal>>,
}

impl BreadcrumbResolver {
    pub fn new(
        contests: Signal<Vec<Contest>>,
        teams: Signal<Vec<Team>>,
        appeals: Signal<Vec<Appeal>>,
    ) -> Self {
        Self {
            contests,
            teams,
            appeals,
        }
    }

    fn contest_label(&self, contest: &RouteId) -> String {
        self.contests
            .with(|contests| {
                contest.id().and_then(|id| {
                    contests
                        .iter()
                        .find(|c| c.id == id)
                        .map(|c| c.name.clone())
                })
            })
            .unwrap_or_else(|| UNKNOWN_CONTEST.to_owned())
    }

    /// A round is only found under its own contest; a matching round id
    /// in another contest does not count.
    fn round_label(&self, contest: &RouteId, round: &RouteId) -> String {
        self.contests
            .with(|contests| {
                let parent = contest
                    .id()
                    .and_then(|id| contests.iter().find(|c| c.id == id))?;
                round.id().and_then(|id| {
                    parent
                        .rounds
                        .iter()
                        .find(|r| r.id == id)
                        .map(|r| r.name.clone())
                })
            })
            .unwrap_or_else(|| UNKNOWN_ROUND.to_owned())
    }

    fn problem_label(
        &self,
        contest: &RouteId,
        round: &RouteId,
        problem: &RouteId,
    ) -> String {
        self.contests
            .with(|contests| {
                let parent = contest
                    .id()
                    .and_then(|id| contests.iter().find(|c| c.id == id))?;
                let round = round
                    .id()
                    .and_then(|id| parent.rounds.iter().find(|r| r.id == id))?;
                problem.id().and_then(|id| {
                    round
                        .problems
                        .iter()
                        .find(|p| p.id == id)
                        .map(|p| format!("Problem {}", p.id))
                })
            })
            .unwrap_or_else(|| UNKNOWN_PROBLEM.to_owned())
    }

    fn team_label(&self, team: &RouteId) -> String {
        self.teams
            .with(|teams| {
                team.id().and_then(|id| {
                    teams.iter().find(|t| t.id == id).map(|t| t.name.clone())
                })
            })
            .unwrap_or_else(|| UNKNOWN_TEAM.to_owned())
    }

    fn appeal_label(&self, appeal: &RouteId) -> String {
        self.appeals
            .with(|appeals| {
                appeal.id().and_then(|id| {
                    appeals
                        .iter()
                        .find(|a| a.id == id)
                        .map(|a| a.subject.clone())
                })
            })
            .unwrap_or_else(|| UNKNOWN_APPEAL.to_owned())
    }

    pub fn resolve(&self, page: &PageKind) -> Trail {
        let mut trail = Trail::default();
        trail.push("Dashboard", "/");
        match page {
            PageKind::Dashboard => {}
            PageKind::Contests => trail.push("Contests", "/contests"),
            PageKind::Contest { contest } => {
                trail.push("Contests", "/contests");
                trail.push(
                    self.contest_label(contest),
                    format!("/contests/{}", contest.raw()),
                );
            }
            PageKind::Round { contest, round } => {
                trail.push("Contests", "/contests");
                trail.push(
                    self.contest_label(contest),
                    format!("/contests/{}", contest.raw()),
                );
                trail.push(
                    self.round_label(contest, round),
                    format!(
                        "/contests/{}/rounds/{}",
                        contest.raw(),
                        round.raw()
                    ),
                );
            }
            PageKind::Problem {
                contest,
                round,
                problem,
            }
            | PageKind::TestCases {
                contest,
                round,
                problem,
            } => {
                trail.push("Contests", "/contests");
                trail.push(
                    self.contest_label(contest),
                    format!("/contests/{}", contest.raw()),
                );
                trail.push(
                    self.round_label(contest, round),
                    format!(
                        "/contests/{}/rounds/{}",
                        contest.raw(),
                        round.raw()
                    ),
                );
                trail.push(
                    self.problem_label(contest, round, problem),
                    format!(
                        "/contests/{}/rounds/{}/problems/{}",
                        contest.raw(),
                        round.raw(),
                        problem.raw()
                    ),
                );
                if let PageKind::TestCases { .. } = page {
                    trail.push(
                        "Test Cases",
                        format!(
                            "/contests/{}/rounds/{}/problems/{}/test-cases",
                            contest.raw(),
                            round.raw(),
                            problem.raw()
                        ),
                    );
                }
            }
            PageKind::Teams => trail.push("Teams", "/teams"),
            PageKind::Team { team } => {
                trail.push("Teams", "/teams");
                trail.push(
                    self.team_label(team),
                    format!("/teams/{}", team.raw()),
                );
            }
            PageKind::Appeals => trail.push("Appeals", "/appeals"),
            PageKind::Appeal { appeal } => {
                trail.push("Appeals", "/appeals");
                trail.push(
                    self.appeal_label(appeal),
                    format!("/appeals/{}", appeal.raw()),
                );
            }
            PageKind::Judges => trail.push("Judges", "/judges"),
            PageKind::Certificates => {
                trail.push("Certificates", "/certificates")
            }
        }
        trail
    }
}
