//! Treatment preview selection.
//!
//! Tracks the selected treatment and the processed/unprocessed toggle, and
//! derives the color to render. Commands that arrive before the preview
//! surface has loaded are queued and flushed once on the first ready event.

mod color;

use serde::{Deserialize, Serialize};

pub use color::{Rgb, PROCESSED_FALLBACK_FACTOR};

use crate::error::{Discarded, WorkflowError};
use crate::ids::TreatmentId;
use crate::registry::TreatmentDefinition;
use crate::transition::Transition;

/// Derive the render color of a treatment.
///
/// Without an explicit processed color, the unprocessed triple is darkened by
/// [`PROCESSED_FALLBACK_FACTOR`].
pub fn derive_color(treatment: &TreatmentDefinition, processed: bool) -> Rgb {
    if processed {
        treatment
            .processed
            .unwrap_or_else(|| treatment.unprocessed.scaled(PROCESSED_FALLBACK_FACTOR))
    } else {
        treatment.unprocessed
    }
}

/// `render_color` is `None` exactly when `treatment` is `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviewSelection {
    pub treatment: Option<TreatmentId>,
    pub processed: bool,
    pub render_color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviewState {
    pub surface_ready: bool,
    pub selection: PreviewSelection,
    pub pending: Vec<PreviewCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewCommand {
    Select(TreatmentId),
    ToggleProcessed,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    Command(PreviewCommand),
    SurfaceReady,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewAction {
    SetColor(Option<Rgb>),
    ShowDetails { name: String, note: String },
}

pub type PreviewTransition = Transition<PreviewState, PreviewAction>;

pub struct PreviewStateMachine;

impl PreviewStateMachine {
    /// Apply an event. Fails only for treatments missing from `catalog`.
    pub fn transition(
        state: PreviewState,
        event: PreviewEvent,
        catalog: &[TreatmentDefinition],
    ) -> Result<PreviewTransition, WorkflowError> {
        match event {
            PreviewEvent::Command(command) => {
                if let PreviewCommand::Select(id) = &command {
                    lookup(catalog, id)?;
                }
                if !state.surface_ready {
                    let mut state = state;
                    state.pending.push(command);
                    return Ok(PreviewTransition::discard(state, Discarded::SurfaceNotReady));
                }
                apply(state, command, catalog)
            }
            PreviewEvent::SurfaceReady if state.surface_ready => Ok(PreviewTransition::stay(state)),
            PreviewEvent::SurfaceReady => flush(state, catalog),
        }
    }
}

/// Fold every queued command into the state, then push the outcome once:
/// a single color and, if a treatment ended up selected, its details.
fn flush(
    state: PreviewState,
    catalog: &[TreatmentDefinition],
) -> Result<PreviewTransition, WorkflowError> {
    let mut state = state;
    state.surface_ready = true;
    let pending = std::mem::take(&mut state.pending);
    if pending.is_empty() {
        return Ok(PreviewTransition::stay(state));
    }

    let mut changed = false;
    for command in pending {
        let t = apply(state, command, catalog)?;
        changed |= t.discarded.is_none();
        state = t.next;
    }
    if !changed {
        return Ok(PreviewTransition::stay(state));
    }

    let mut actions = vec![PreviewAction::SetColor(state.selection.render_color)];
    if let Some(id) = &state.selection.treatment {
        let treatment = lookup(catalog, id)?;
        actions.push(PreviewAction::ShowDetails {
            name: treatment.name.clone(),
            note: treatment.note.clone(),
        });
    }
    Ok(PreviewTransition::to(state, actions))
}

fn lookup<'a>(
    catalog: &'a [TreatmentDefinition],
    id: &TreatmentId,
) -> Result<&'a TreatmentDefinition, WorkflowError> {
    catalog
        .iter()
        .find(|t| &t.id == id)
        .ok_or_else(|| WorkflowError::UnknownTreatment(id.clone()))
}

fn apply(
    state: PreviewState,
    command: PreviewCommand,
    catalog: &[TreatmentDefinition],
) -> Result<PreviewTransition, WorkflowError> {
    let mut state = state;
    match command {
        PreviewCommand::Select(id) => {
            let treatment = lookup(catalog, &id)?;
            let color = derive_color(treatment, state.selection.processed);
            let details = PreviewAction::ShowDetails {
                name: treatment.name.clone(),
                note: treatment.note.clone(),
            };
            state.selection.treatment = Some(id);
            state.selection.render_color = Some(color);
            Ok(PreviewTransition::to(
                state,
                vec![PreviewAction::SetColor(Some(color)), details],
            ))
        }
        PreviewCommand::ToggleProcessed => {
            let Some(id) = state.selection.treatment.clone() else {
                return Ok(PreviewTransition::discard(state, Discarded::InvalidToggle));
            };
            let treatment = lookup(catalog, &id)?;
            state.selection.processed = !state.selection.processed;
            let color = derive_color(treatment, state.selection.processed);
            state.selection.render_color = Some(color);
            Ok(PreviewTransition::to(
                state,
                vec![PreviewAction::SetColor(Some(color))],
            ))
        }
        PreviewCommand::Reset => {
            state.selection = PreviewSelection::default();
            Ok(PreviewTransition::to(state, vec![PreviewAction::SetColor(None)]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<TreatmentDefinition> {
        vec![
            TreatmentDefinition {
                id: TreatmentId::from("celadon"),
                name: "Celadon".into(),
                note: "Soft green".into(),
                unprocessed: Rgb::new(0.7, 0.8, 0.7),
                processed: Some(Rgb::new(0.4, 0.6, 0.5)),
            },
            TreatmentDefinition {
                id: TreatmentId::from("tenmoku"),
                name: "Tenmoku".into(),
                note: String::new(),
                unprocessed: Rgb::new(0.5, 0.35, 0.2),
                processed: None,
            },
        ]
    }

    fn ready() -> PreviewState {
        PreviewState {
            surface_ready: true,
            ..PreviewState::default()
        }
    }

    fn command(state: PreviewState, command: PreviewCommand) -> PreviewTransition {
        PreviewStateMachine::transition(state, PreviewEvent::Command(command), &catalog()).unwrap()
    }

    #[test]
    fn select_sets_unprocessed_color() {
        let t = command(ready(), PreviewCommand::Select("celadon".into()));
        assert_eq!(t.next.selection.render_color, Some(Rgb::new(0.7, 0.8, 0.7)));
        assert!(t.actions.contains(&PreviewAction::SetColor(Some(Rgb::new(0.7, 0.8, 0.7)))));
    }

    #[test]
    fn toggle_without_processed_color_uses_fallback_factor() {
        let t = command(ready(), PreviewCommand::Select("tenmoku".into()));
        let t = command(t.next, PreviewCommand::ToggleProcessed);
        assert!(t.next.selection.processed);
        assert_eq!(
            t.next.selection.render_color,
            Some(Rgb::new(0.5, 0.35, 0.2).scaled(PROCESSED_FALLBACK_FACTOR))
        );
    }

    #[test]
    fn select_preserves_processed_flag() {
        let t = command(ready(), PreviewCommand::Select("tenmoku".into()));
        let t = command(t.next, PreviewCommand::ToggleProcessed);
        let t = command(t.next, PreviewCommand::Select("celadon".into()));
        assert!(t.next.selection.processed);
        assert_eq!(t.next.selection.render_color, Some(Rgb::new(0.4, 0.6, 0.5)));
    }

    #[test]
    fn toggle_with_nothing_selected_is_invalid_and_keeps_color_unset() {
        let t = command(ready(), PreviewCommand::ToggleProcessed);
        assert_eq!(t.discarded, Some(Discarded::InvalidToggle));
        assert!(!t.next.selection.processed);
        assert_eq!(t.next.selection.render_color, None);
    }

    #[test]
    fn reset_clears_selection_and_color() {
        let t = command(ready(), PreviewCommand::Select("celadon".into()));
        let t = command(t.next, PreviewCommand::Reset);
        assert_eq!(t.next.selection, PreviewSelection::default());
        assert_eq!(t.actions, vec![PreviewAction::SetColor(None)]);
    }

    #[test]
    fn unknown_treatment_is_rejected_even_before_ready() {
        let err = PreviewStateMachine::transition(
            PreviewState::default(),
            PreviewEvent::Command(PreviewCommand::Select("raku".into())),
            &catalog(),
        )
        .unwrap_err();
        assert_eq!(err, WorkflowError::UnknownTreatment("raku".into()));
    }

    #[test]
    fn commands_before_ready_are_queued_then_flushed_once() {
        let t = command(PreviewState::default(), PreviewCommand::Select("celadon".into()));
        assert_eq!(t.discarded, Some(Discarded::SurfaceNotReady));
        assert_eq!(t.next.selection.render_color, None);

        let flushed =
            PreviewStateMachine::transition(t.next, PreviewEvent::SurfaceReady, &catalog()).unwrap();
        assert!(flushed.next.pending.is_empty());
        assert_eq!(
            flushed.next.selection.render_color,
            Some(Rgb::new(0.7, 0.8, 0.7))
        );

        let again =
            PreviewStateMachine::transition(flushed.next.clone(), PreviewEvent::SurfaceReady, &catalog())
                .unwrap();
        assert!(again.actions.is_empty());
        assert_eq!(again.next, flushed.next);
    }

    #[test]
    fn flush_folds_queued_commands_into_one_push() {
        let queued = [
            PreviewCommand::Select("celadon".into()),
            PreviewCommand::Select("tenmoku".into()),
            PreviewCommand::ToggleProcessed,
        ];
        let state = queued
            .into_iter()
            .fold(PreviewState::default(), |state, c| command(state, c).next);
        assert_eq!(state.pending.len(), 3);

        let flushed =
            PreviewStateMachine::transition(state, PreviewEvent::SurfaceReady, &catalog()).unwrap();

        let expected = Rgb::new(0.5, 0.35, 0.2).scaled(PROCESSED_FALLBACK_FACTOR);
        assert_eq!(flushed.next.selection.render_color, Some(expected));
        assert_eq!(
            flushed.actions,
            vec![
                PreviewAction::SetColor(Some(expected)),
                PreviewAction::ShowDetails {
                    name: "Tenmoku".into(),
                    note: String::new(),
                },
            ]
        );
    }

    #[test]
    fn flush_of_only_invalid_toggles_pushes_nothing() {
        let state = command(PreviewState::default(), PreviewCommand::ToggleProcessed).next;

        let flushed =
            PreviewStateMachine::transition(state, PreviewEvent::SurfaceReady, &catalog()).unwrap();

        assert!(flushed.next.surface_ready);
        assert!(flushed.actions.is_empty());
    }
}
