use super::StoreState;
use crate::{api::*, error::*, model::*};
use leptos::*;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SchoolForm {
    pub name: String,
}

impl SchoolForm {
    pub fn validate(&self) -> FieldErrors {
        self.parse().err().unwrap_or_default()
    }

    pub fn parse(&self) -> Result<SchoolData, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", REQUIRED.to_owned());
            return Err(errors);
        }
        Ok(SchoolData {
            name: self.name.trim().to_owned(),
        })
    }
}

#[derive(Clone)]
pub struct SchoolStore<B: Backend> {
    backend: B,
    state: StoreState<School>,
}

impl<B: Backend> SchoolStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: StoreState::new(),
        }
    }

    pub fn data(&self) -> RwSignal<Vec<School>> {
        self.state.data
    }

    pub fn loading(&self) -> RwSignal<bool> {
        self.state.loading
    }

    pub fn error(&self) -> RwSignal<Option<Error>> {
        self.state.error
    }

    pub async fn load(&self) -> Result<()> {
        let schools = self.state.run(self.backend.list_schools()).await?;
        self.state.data.set(schools);
        Ok(())
    }

    pub async fn add(&self, data: SchoolData) -> Result<School> {
        let school = self.state.run(self.backend.add_school(data)).await?;
        self.state.append(school.clone());
        Ok(school)
    }

    pub async fn update(
        &self,
        school: i32,
        data: SchoolData,
    ) -> Result<School> {
        let updated = self
            .state
            .run(self.backend.update_school(school, data))
            .await?;
        self.state.replace(updated.clone(), |s| s.id);
        Ok(updated)
    }

    pub async fn remove(&self, school: i32) -> Result<School> {
        let removed =
            self.state.run(self.backend.remove_school(school)).await?;
        self.state.remove_local(removed.id, |s| s.id);
        Ok(removed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repo::MockRepo;

    #[tokio::test]
    async fn rename_school() {
        let rt = create_runtime();
        let store = SchoolStore::new(MockRepo::new());
        let school = store
            .add(SchoolData {
                name: "Old Name".to_owned(),
            })
            .await
            .unwrap();
        store
            .update(
                school.id,
                SchoolData {
                    name: "New Name".to_owned(),
                },
            )
            .await
            .unwrap();
        assert_eq!(store.data().get_untracked()[0].name, "New Name");
        rt.dispose();
    }
}
