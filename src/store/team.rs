use leptos::*;

use super::StoreState;
use crate::{api::*, error::*, model::*};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TeamForm {
    pub name: String,
    /// Empty means no school affiliation.
    pub school_id: String,
}

impl TeamForm {
    pub fn validate(&self) -> FieldErrors {
        self.parse().err().unwrap_or_default()
    }

    pub fn parse(&self) -> Result<TeamData, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", REQUIRED.to_owned());
        }
        let school_id = match self.school_id.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.insert("schoolId", "invalid school".to_owned());
                    None
                }
            },
        };
        if errors.is_empty() {
            Ok(TeamData {
                name: self.name.trim().to_owned(),
                school_id,
            })
        } else {
            Err(errors)
        }
    }
}

#[derive(Clone)]
pub struct TeamStore<B: Backend> {
    backend: B,
    state: StoreState<Team>,
    pages: RwSignal<PageInfo>,
}

impl<B: Backend> TeamStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: StoreState::new(),
            pages: create_rw_signal(PageInfo::default()),
        }
    }

    pub fn data(&self) -> RwSignal<Vec<Team>> {
        self.state.data
    }

    pub fn loading(&self) -> RwSignal<bool> {
        self.state.loading
    }

    pub fn error(&self) -> RwSignal<Option<Error>> {
        self.state.error
    }

    pub fn pages(&self) -> RwSignal<PageInfo> {
        self.pages
    }

    pub async fn load(&self, page: Paginate) -> Result<()> {
        let envelope = self.state.run(self.backend.list_teams(page)).await?;
        self.state.data.set(envelope.data);
        self.pages.set(envelope.additional_data);
        Ok(())
    }

    pub async fn add(&self, data: TeamData) -> Result<Team> {
        let team = self.state.run(self.backend.add_team(data)).await?;
        self.state.append(team.clone());
        Ok(team)
    }

    pub async fn update(&self, team: i32, data: TeamData) -> Result<Team> {
        let updated =
            self.state.run(self.backend.update_team(team, data)).await?;
        self.state.replace(updated.clone(), |t| t.id);
        Ok(updated)
    }

    pub async fn remove(&self, team: i32) -> Result<Team> {
        let removed = self.state.run(self.backend.remove_team(team)).await?;
        self.state.remove_local(removed.id, |t| t.id);
        Ok(removed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repo::MockRepo;

    #[test]
    fn validate_school_reference() {
        let form = TeamForm {
            name: "Rustaceans".to_owned(),
            school_id: "abc".to_owned(),
        };
        assert_eq!(
            form.validate().get("schoolId").map(String::as_str),
            Some("invalid school")
        );

        let form = TeamForm {
            name: "Rustaceans".to_owned(),
            school_id: String::new(),
        };
        assert_eq!(form.parse().unwrap().school_id, None);
    }

    #[tokio::test]
    async fn add_and_remove() {
        let rt = create_runtime();
        let store = TeamStore::new(MockRepo::new());
        let team = store
            .add(TeamData {
                name: "Rustaceans".to_owned(),
                school_id: None,
            })
            .await
            .unwrap();
        assert_eq!(store.data().get_untracked().len(), 1);
        store.remove(team.id).await.unwrap();
        assert!(store.data().get_untracked().is_empty());
        rt.dispose();
    }
}
