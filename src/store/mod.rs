//! Per-entity store controllers: a uniform facade over the backend with
//! reactive `{data, loading, error}` state.
//!
//! The `data` signal is the single source of truth for rendering.
//! Mutations merge their result locally (append, replace-by-id,
//! retain-by-id) instead of refetching; after a conflicting concurrent
//! edit the list can therefore be stale until the next full `load`.
//! That limitation is deliberate and surfaced, not masked.

mod contest;
mod problem;
mod round;
mod school;
mod team;
mod test_case;

pub use contest::{ContestForm, ContestStore};
pub use problem::{ProblemForm, ProblemStore};
pub use round::{RoundForm, RoundStore};
pub use school::{SchoolForm, SchoolStore};
pub use team::{TeamForm, TeamStore};
pub use test_case::{TestCaseForm, TestCaseStore};

use leptos::*;

use crate::error::*;

/// Reactive cell shared by every controller. `Copy` like the signals it
/// wraps; clones observe the same state.
pub struct StoreState<T: 'static> {
    pub data: RwSignal<Vec<T>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<Error>>,
}

impl<T> Clone for StoreState<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for StoreState<T> {}

impl<T> StoreState<T> {
    fn new() -> Self {
        Self {
            data: create_rw_signal(Vec::new()),
            loading: create_rw_signal(false),
            error: create_rw_signal(None),
        }
    }

    /// Wrap one backend call with the loading/error lifecycle: raise
    /// `loading`, clear the previous `error`, store a failure and hand
    /// it back to the caller (a dialog submit handler typically keeps
    /// itself open on `Err`).
    async fn run<R>(
        &self,
        op: impl std::future::Future<Output = Result<R>>,
    ) -> Result<R> {
        self.loading.set(true);
        self.error.set(None);
        let out = op.await;
        self.loading.set(false);
        if let Err(err) = &out {
            self.error.set(Some(err.clone()));
        }
        out
    }

    fn append(&self, item: T) {
        self.data.update(|list| list.push(item));
    }

    fn replace(&self, item: T, id: impl Fn(&T) -> i32) {
        let key = id(&item);
        self.data.update(move |list| {
            if let Some(slot) = list.iter_mut().find(|t| id(t) == key) {
                *slot = item;
            }
        });
    }

    fn remove_local(&self, key: i32, id: impl Fn(&T) -> i32 + 'static) {
        self.data.update(move |list| list.retain(|t| id(t) != key));
    }
}
