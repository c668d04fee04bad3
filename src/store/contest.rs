use leptos::*;

use super::StoreState;
use crate::{api::*, error::*, model::*};

/// Raw dialog fields; everything arrives as text from the form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContestForm {
    pub year: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub status: ContestStatus,
}

impl ContestForm {
    /// Required-field and type checks only; empty map means valid.
    pub fn validate(&self) -> FieldErrors {
        self.parse().err().unwrap_or_default()
    }

    pub fn parse(&self) -> Result<ContestData, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", REQUIRED.to_owned());
        }
        let year = if self.year.trim().is_empty() {
            errors.insert("year", REQUIRED.to_owned());
            None
        } else {
            match self.year.trim().parse::<i32>() {
                Ok(year) => Some(year),
                Err(_) => {
                    errors.insert("year", "invalid year".to_owned());
                    None
                }
            }
        };
        match year {
            Some(year) if errors.is_empty() => Ok(ContestData {
                year,
                name: self.name.trim().to_owned(),
                description: self.description.clone(),
                image_url: (!self.image_url.trim().is_empty())
                    .then(|| self.image_url.trim().to_owned()),
                status: self.status,
            }),
            _ => Err(errors),
        }
    }
}

/// Top-level contest collection, paginated.
#[derive(Clone)]
pub struct ContestStore<B: Backend> {
    backend: B,
    state: StoreState<Contest>,
    pages: RwSignal<PageInfo>,
}

impl<B: Backend> ContestStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: StoreState::new(),
            pages: create_rw_signal(PageInfo::default()),
        }
    }

    pub fn data(&self) -> RwSignal<Vec<Contest>> {
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
        let envelope = self.state.run(self.backend.list_contests(page)).await?;
        self.state.data.set(envelope.data);
        self.pages.set(envelope.additional_data);
        Ok(())
    }

    pub async fn add(&self, data: ContestData) -> Result<Contest> {
        let contest = self.state.run(self.backend.add_contest(data)).await?;
        self.state.append(contest.clone());
        Ok(contest)
    }

    pub async fn update(
        &self,
        contest: i32,
        data: ContestData,
    ) -> Result<Contest> {
        let updated = self
            .state
            .run(self.backend.update_contest(contest, data))
            .await?;
        self.state.replace(updated.clone(), |c| c.id);
        Ok(updated)
    }

    pub async fn remove(&self, contest: i32) -> Result<Removed<Contest>> {
        let removed =
            self.state.run(self.backend.remove_contest(contest)).await?;
        self.state.remove_local(removed.entity.id, |c| c.id);
        Ok(removed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repo::MockRepo;

    fn form(name: &str) -> ContestForm {
        ContestForm {
            year: "2025".to_owned(),
            name: name.to_owned(),
            ..ContestForm::default()
        }
    }

    #[test]
    fn validate_required_fields() {
        let errors = ContestForm::default().validate();
        assert_eq!(errors.get("name").map(String::as_str), Some(REQUIRED));
        assert_eq!(errors.get("year").map(String::as_str), Some(REQUIRED));

        let errors = ContestForm {
            year: "two thousand".to_owned(),
            name: "Nationals".to_owned(),
            ..ContestForm::default()
        }
        .validate();
        assert_eq!(
            errors.get("year").map(String::as_str),
            Some("invalid year")
        );

        assert!(form("Nationals").validate().is_empty());
    }

    #[tokio::test]
    /// successful mutations merge locally, no refetch
    async fn optimistic_merge() {
        let rt = create_runtime();
        let store = ContestStore::new(MockRepo::new());

        let data = form("Nationals").parse().unwrap();
        let contest = store.add(data).await.unwrap();
        assert_eq!(store.data().get_untracked().len(), 1);

        let mut data = form("Renamed").parse().unwrap();
        data.status = ContestStatus::Published;
        store.update(contest.id, data).await.unwrap();
        let list = store.data().get_untracked();
        assert_eq!(list[0].name, "Renamed");
        assert_eq!(list[0].status, ContestStatus::Published);

        store.remove(contest.id).await.unwrap();
        assert!(store.data().get_untracked().is_empty());
        assert!(!store.loading().get_untracked());
        rt.dispose();
    }

    #[tokio::test]
    /// a failed operation stores the error, keeps data, and re-throws
    async fn failure_sets_error_and_keeps_data() {
        let rt = create_runtime();
        let store = ContestStore::new(MockRepo::new());
        store.add(form("Nationals").parse().unwrap()).await.unwrap();

        let err = store
            .update(999, form("ghost").parse().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(
            store.error().get_untracked().map(|e| e.kind),
            Some(ErrorKind::NotFound)
        );
        assert_eq!(store.data().get_untracked().len(), 1);
        assert!(!store.loading().get_untracked());

        // next successful call clears the stale error
        store.load(Paginate::default()).await.unwrap();
        assert!(store.error().get_untracked().is_none());
        rt.dispose();
    }

    #[tokio::test]
    async fn load_tracks_page_info() {
        let rt = create_runtime();
        let repo = MockRepo::new();
        let store = ContestStore::new(repo.clone());
        for i in 0..3 {
            store.add(form(&format!("c{i}")).parse().unwrap()).await.unwrap();
        }
        store.load(Paginate::page(1, 2)).await.unwrap();
        assert_eq!(store.data().get_untracked().len(), 2);
        assert_eq!(store.pages().get_untracked().total_pages, 2);
        rt.dispose();
    }
}
