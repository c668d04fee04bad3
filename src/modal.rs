//! Single-slot modal orchestrator.
//!
//! Every create/edit/delete dialog in the app goes through one slot: at
//! most one dialog is ever mounted, opening a second replaces the first
//! outright (no stacking, no queue). Closing is two-phase so an exit
//! transition can play before the dialog unmounts: `close()` keeps the
//! slot occupied with `is_open() == false`, `settle()` clears it. On
//! wasm, `close()` schedules `settle()` itself after [`CLOSE_DELAY`];
//! native hosts (and tests) drive `settle()` directly.
//!
//! The orchestrator never calls into a store: a dialog's own submit
//! handler performs the store operation and then calls `close()`,
//! usually only on success.

use std::{collections::HashMap, rc::Rc, time::Duration};

use leptos::*;

pub const CLOSE_DELAY: Duration = Duration::from_millis(300);

/// The fixed vocabulary of dialogs. Callers and the registry share this
/// enum, so an unknown "modal type string" cannot be spelled at all;
/// a kind that was never registered is still possible and treated as a
/// configuration gap at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    ContestForm,
    RoundForm,
    ProblemForm,
    TestCaseForm,
    TeamForm,
    SchoolForm,
    ConfirmDelete,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalProps {
    pub contest_id: Option<i32>,
    pub round_id: Option<i32>,
    pub problem_id: Option<i32>,
    /// Entity being edited or deleted; `None` when creating.
    pub target_id: Option<i32>,
    /// Prefill for edit dialogs.
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum Slot {
    #[default]
    Closed,
    Open {
        kind: ModalKind,
        props: ModalProps,
        leaving: bool,
    },
}

#[derive(Clone, Copy)]
pub struct ModalOrchestrator {
    slot: RwSignal<Slot>,
}

impl Default for ModalOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalOrchestrator {
    pub fn new() -> Self {
        Self {
            slot: create_rw_signal(Slot::Closed),
        }
    }

    pub fn open(&self, kind: ModalKind, props: ModalProps) {
        tracing::debug!(?kind, "open modal");
        self.slot.set(Slot::Open {
            kind,
            props,
            leaving: false,
        });
    }

    /// Begin the two-phase close. The dialog stays mounted until
    /// [`settle`](Self::settle) runs.
    pub fn close(&self) {
        self.slot.update(|slot| {
            if let Slot::Open { leaving, .. } = slot {
                *leaving = true;
            }
        });
        #[cfg(target_arch = "wasm32")]
        {
            let this = *self;
            gloo::timers::callback::Timeout::new(
                CLOSE_DELAY.as_millis() as u32,
                move || this.settle(),
            )
            .forget();
        }
    }

    /// Finish a close that [`close`](Self::close) started. No-op if the
    /// slot was reopened in the meantime.
    pub fn settle(&self) {
        self.slot.update(|slot| {
            if matches!(slot, Slot::Open { leaving: true, .. }) {
                *slot = Slot::Closed;
            }
        });
    }

    /// Immediate teardown, for navigating away mid-dialog.
    pub fn reset(&self) {
        self.slot.set(Slot::Closed);
    }

    /// Kind occupying the slot, including a dialog playing its exit
    /// transition.
    pub fn mounted(&self) -> Option<ModalKind> {
        self.slot.with(|slot| match slot {
            Slot::Open { kind, .. } => Some(*kind),
            Slot::Closed => None,
        })
    }

    /// Kind of the dialog currently shown as open.
    pub fn visible(&self) -> Option<ModalKind> {
        self.slot.with(|slot| match slot {
            Slot::Open {
                kind,
                leaving: false,
                ..
            } => Some(*kind),
            _ => None,
        })
    }

    pub fn is_open(&self) -> bool {
        self.visible().is_some()
    }

    pub fn props(&self) -> Option<ModalProps> {
        self.slot.with(|slot| match slot {
            Slot::Open { props, .. } => Some(props.clone()),
            Slot::Closed => None,
        })
    }
}

pub fn provide_modal() {
    provide_context(ModalOrchestrator::new());
}

pub fn use_modal() -> ModalOrchestrator {
    expect_context()
}

/// Maps a [`ModalKind`] to the dialog it mounts. `V` is the host's view
/// type; tests use plain values.
pub struct ModalRegistry<V> {
    builders: HashMap<ModalKind, Rc<dyn Fn(ModalProps) -> V>>,
}

impl<V> Default for ModalRegistry<V> {
    fn default() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }
}

impl<V> ModalRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        kind: ModalKind,
        builder: impl Fn(ModalProps) -> V + 'static,
    ) -> Self {
        self.builders.insert(kind, Rc::new(builder));
        self
    }

    /// Build the dialog for whatever occupies the slot. A kind with no
    /// registered dialog asserts in debug builds and renders nothing in
    /// release, so a miswired dialog is loud in development without
    /// taking the page down in production.
    pub fn render(&self, modal: &ModalOrchestrator) -> Option<V> {
        let kind = modal.mounted()?;
        let Some(builder) = self.builders.get(&kind) else {
            tracing::error!(?kind, "no dialog registered for modal kind");
            debug_assert!(false, "no dialog registered for {kind:?}");
            return None;
        };
        let props = modal.props().unwrap_or_default();
        Some(builder(props))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    /// opening a second dialog replaces the first, no stacking
    fn open_replaces_open() {
        let rt = create_runtime();
        let modal = ModalOrchestrator::new();
        assert_eq!(modal.visible(), None);

        modal.open(ModalKind::ContestForm, ModalProps::default());
        modal.open(ModalKind::RoundForm, ModalProps::default());
        assert_eq!(modal.visible(), Some(ModalKind::RoundForm));
        rt.dispose();
    }

    #[test]
    fn two_phase_close() {
        let rt = create_runtime();
        let modal = ModalOrchestrator::new();
        modal.open(ModalKind::TeamForm, ModalProps::default());

        modal.close();
        // exit transition: still mounted, no longer open
        assert_eq!(modal.mounted(), Some(ModalKind::TeamForm));
        assert!(!modal.is_open());

        modal.settle();
        assert_eq!(modal.mounted(), None);
        rt.dispose();
    }

    #[test]
    /// a reopen during the exit transition survives the stale settle
    fn settle_after_reopen_is_noop() {
        let rt = create_runtime();
        let modal = ModalOrchestrator::new();
        modal.open(ModalKind::ContestForm, ModalProps::default());
        modal.close();
        modal.open(ModalKind::ProblemForm, ModalProps::default());

        modal.settle();
        assert_eq!(modal.visible(), Some(ModalKind::ProblemForm));
        rt.dispose();
    }

    #[test]
    fn props_reach_the_dialog() {
        let rt = create_runtime();
        let modal = ModalOrchestrator::new();
        let registry: ModalRegistry<Option<i32>> = ModalRegistry::new()
            .register(ModalKind::RoundForm, |props| props.contest_id);

        modal.open(
            ModalKind::RoundForm,
            ModalProps {
                contest_id: Some(7),
                ..ModalProps::default()
            },
        );
        assert_eq!(registry.render(&modal), Some(Some(7)));

        modal.reset();
        assert_eq!(registry.render(&modal), None);
        rt.dispose();
    }

    #[test]
    #[should_panic(expected = "no dialog registered")]
    fn unregistered_kind_is_loud_in_debug() {
        let rt = create_runtime();
        let modal = ModalOrchestrator::new();
        let registry: ModalRegistry<()> = ModalRegistry::new();
        modal.open(ModalKind::SchoolForm, ModalProps::default());
        let _ = registry.render(&modal);
        rt.dispose();
    }
}
