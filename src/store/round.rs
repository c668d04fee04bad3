use chrono::{DateTime, Utc};
use leptos::*;

use super::StoreState;
use crate::{api::*, error::*, model::*};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoundForm {
    pub name: String,
    pub start: String,
    pub end: String,
}

fn parse_stamp(
    raw: &str,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, REQUIRED.to_owned());
        return None;
    }
    match raw.parse() {
        Ok(stamp) => Some(stamp),
        Err(_) => {
            errors.insert(field, "invalid timestamp".to_owned());
            None
        }
    }
}

impl RoundForm {
    /// Non-empty iff `name` is empty, `start`/`end` is empty or
    /// unparseable, or `end` precedes `start`.
    pub fn validate(&self) -> FieldErrors {
        self.parse().err().unwrap_or_default()
    }

    pub fn parse(&self) -> Result<RoundData, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", REQUIRED.to_owned());
        }
        let start = parse_stamp(&self.start, "start", &mut errors);
        let end = parse_stamp(&self.end, "end", &mut errors);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                errors.insert("end", "must not precede start".to_owned());
            }
        }
        match (start, end) {
            (Some(start), Some(end)) if errors.is_empty() => Ok(RoundData {
                name: self.name.trim().to_owned(),
                start,
                end,
            }),
            _ => Err(errors),
        }
    }
}

/// Rounds of one contest; the parent id is fixed at construction.
#[derive(Clone)]
pub struct RoundStore<B: Backend> {
    backend: B,
    contest_id: i32,
    state: StoreState<Round>,
}

impl<B: Backend> RoundStore<B> {
    pub fn new(backend: B, contest_id: i32) -> Self {
        Self {
            backend,
            contest_id,
            state: StoreState::new(),
        }
    }

    pub fn contest_id(&self) -> i32 {
        self.contest_id
    }

    pub fn data(&self) -> RwSignal<Vec<Round>> {
        self.state.data
    }

    pub fn loading(&self) -> RwSignal<bool> {
        self.state.loading
    }

    pub fn error(&self) -> RwSignal<Option<Error>> {
        self.state.error
    }

    pub async fn load(&self) -> Result<()> {
        let rounds = self
            .state
            .run(self.backend.list_rounds(self.contest_id))
            .await?;
        self.state.data.set(rounds);
        Ok(())
    }

    pub async fn add(&self, data: RoundData) -> Result<Round> {
        let round = self
            .state
            .run(self.backend.add_round(self.contest_id, data))
            .await?;
        self.state.append(round.clone());
        Ok(round)
    }

    pub async fn update(&self, round: i32, data: RoundData) -> Result<Round> {
        let updated = self
            .state
            .run(self.backend.update_round(self.contest_id, round, data))
            .await?;
        self.state.replace(updated.clone(), |r| r.id);
        Ok(updated)
    }

    pub async fn remove(&self, round: i32) -> Result<Removed<Round>> {
        let removed = self
            .state
            .run(self.backend.remove_round(self.contest_id, round))
            .await?;
        self.state.remove_local(removed.entity.id, |r| r.id);
        Ok(removed)
    }
}
