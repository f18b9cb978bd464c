use crate::io::repository::{ItemRepository, RepoError};
use crate::model::draft::{DraftField, ListingDraft};
use crate::model::item::Item;
use crate::model::locale::Language;

/// One page of the sell form, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    BasicInfo,
    Photos,
    Details,
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::BasicInfo, Step::Photos, Step::Details, Step::Review];

    /// 1-based position
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn next(self) -> Option<Step> {
        Step::ALL.get(self as usize + 1).copied()
    }

    pub fn previous(self) -> Option<Step> {
        (self as usize).checked_sub(1).map(|i| Step::ALL[i])
    }

    /// Fields that must be filled before leaving this step with `next`
    pub fn required_fields(self) -> &'static [DraftField] {
        match self {
            Step::BasicInfo => &[
                DraftField::Title,
                DraftField::Description,
                DraftField::Price,
                DraftField::Condition,
                DraftField::Category,
            ],
            Step::Photos => &[DraftField::Images],
            Step::Details => &[DraftField::Location],
            Step::Review => &[],
        }
    }

    pub fn title(self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::En, Step::BasicInfo) => "Basic Info",
            (Language::En, Step::Photos) => "Photos",
            (Language::En, Step::Details) => "Details",
            (Language::En, Step::Review) => "Review",
            (Language::Zh, Step::BasicInfo) => "基本信息",
            (Language::Zh, Step::Photos) => "照片",
            (Language::Zh, Step::Details) => "详细信息",
            (Language::Zh, Step::Review) => "确认",
        }
    }
}

/// Where the workflow is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Editing(Step),
    /// Terminal: the catalog accepted the listing
    Submitted { item_id: String },
    /// Terminal: the user walked away; the draft is dropped
    Abandoned,
}

/// Result of a `next` / `previous` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved(Step),
    /// The current step is incomplete; nothing changed
    Gated { step: Step, missing: Vec<DraftField> },
    /// Not applicable in the current state; nothing changed
    Ignored,
}

/// Result of a successful `submit` call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Item),
    /// Some step's fields were emptied after it was passed; stays at Review
    Gated(Vec<DraftField>),
    /// Not at Review; nothing changed
    Ignored,
}

/// The multi-step sell form: one draft, four steps, and a submit at the end
#[derive(Debug, Clone)]
pub struct ListingWorkflow {
    state: WorkflowState,
    draft: ListingDraft,
}

impl Default for ListingWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingWorkflow {
    pub fn new() -> Self {
        ListingWorkflow {
            state: WorkflowState::Editing(Step::BasicInfo),
            draft: ListingDraft::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// The current step, or None once the workflow has finished
    pub fn step(&self) -> Option<Step> {
        match self.state {
            WorkflowState::Editing(step) => Some(step),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step().is_none()
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    /// Mutable access to the draft while editing. Any step may write any field.
    pub fn draft_mut(&mut self) -> Option<&mut ListingDraft> {
        match self.state {
            WorkflowState::Editing(_) => Some(&mut self.draft),
            _ => None,
        }
    }

    /// Required fields of `step` that are not yet filled
    pub fn missing_fields(&self, step: Step) -> Vec<DraftField> {
        step.required_fields()
            .iter()
            .copied()
            .filter(|f| !self.draft.is_filled(*f))
            .collect()
    }

    pub fn is_step_valid(&self, step: Step) -> bool {
        self.missing_fields(step).is_empty()
    }

    /// Advance one step if the current step is complete. No-op at Review.
    pub fn next(&mut self) -> Transition {
        let WorkflowState::Editing(step) = self.state else {
            return Transition::Ignored;
        };
        let Some(target) = step.next() else {
            return Transition::Ignored;
        };
        let missing = self.missing_fields(step);
        if !missing.is_empty() {
            tracing::debug!(step = ?step, missing = ?missing, "step gated");
            return Transition::Gated { step, missing };
        }
        self.state = WorkflowState::Editing(target);
        tracing::debug!(from = ?step, to = ?target, "step advanced");
        Transition::Moved(target)
    }

    /// Go back one step. Entered data is kept. No-op at BasicInfo.
    pub fn previous(&mut self) -> Transition {
        let WorkflowState::Editing(step) = self.state else {
            return Transition::Ignored;
        };
        match step.previous() {
            Some(target) => {
                self.state = WorkflowState::Editing(target);
                tracing::debug!(from = ?step, to = ?target, "step back");
                Transition::Moved(target)
            }
            None => Transition::Ignored,
        }
    }

    /// Hand the frozen draft to the catalog. Only acts at Review.
    ///
    /// On success the workflow becomes `Submitted`. On a repository error it
    /// stays at Review with the draft intact, so the caller can retry.
    pub fn submit<R>(&mut self, repo: &mut R) -> Result<SubmitOutcome, RepoError>
    where
        R: ItemRepository + ?Sized,
    {
        if self.state != WorkflowState::Editing(Step::Review) {
            return Ok(SubmitOutcome::Ignored);
        }
        let missing: Vec<DraftField> = Step::ALL
            .iter()
            .flat_map(|s| self.missing_fields(*s))
            .collect();
        let payload = match self.draft.freeze() {
            Some(p) if missing.is_empty() => p,
            _ => return Ok(SubmitOutcome::Gated(missing)),
        };

        match repo.create_item(&payload) {
            Ok(item) => {
                tracing::info!(item_id = %item.id, title = %item.title, "listing submitted");
                self.state = WorkflowState::Submitted {
                    item_id: item.id.clone(),
                };
                Ok(SubmitOutcome::Submitted(item))
            }
            Err(e) => {
                tracing::warn!(error = %e, "listing submission failed");
                Err(e)
            }
        }
    }

    /// Walk away from the form. The draft is discarded.
    pub fn abandon(&mut self) {
        if !self.is_finished() {
            tracing::debug!("listing draft abandoned");
            self.state = WorkflowState::Abandoned;
            self.draft = ListingDraft::new();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::repository::MemoryRepository;
    use crate::model::item::Condition;
    use pretty_assertions::assert_eq;

    fn fill_basic(wf: &mut ListingWorkflow) {
        let d = wf.draft_mut().unwrap();
        d.title = "X".into();
        d.description = "Y".into();
        d.price = "10".into();
        d.condition = Some(Condition::Good);
        d.category = "Electronics".into();
    }

    fn at_review() -> ListingWorkflow {
        let mut wf = ListingWorkflow::new();
        fill_basic(&mut wf);
        wf.next();
        wf.draft_mut().unwrap().add_images(["a.jpg"]);
        wf.next();
        wf.draft_mut().unwrap().location = "Wellington".into();
        assert_eq!(wf.next(), Transition::Moved(Step::Review));
        wf
    }

    #[test]
    fn test_starts_at_basic_info_with_empty_draft() {
        let wf = ListingWorkflow::new();
        assert_eq!(wf.step(), Some(Step::BasicInfo));
        assert_eq!(wf.draft(), &ListingDraft::new());
    }

    #[test]
    fn test_next_gated_on_empty_title() {
        let mut wf = ListingWorkflow::new();
        fill_basic(&mut wf);
        wf.draft_mut().unwrap().title.clear();
        assert_eq!(
            wf.next(),
            Transition::Gated {
                step: Step::BasicInfo,
                missing: vec![DraftField::Title],
            }
        );
        assert_eq!(wf.step(), Some(Step::BasicInfo));
    }

    #[test]
    fn test_photos_step_needs_an_image() {
        let mut wf = ListingWorkflow::new();
        fill_basic(&mut wf);
        assert_eq!(wf.next(), Transition::Moved(Step::Photos));
        assert!(matches!(wf.next(), Transition::Gated { step: Step::Photos, .. }));
        assert_eq!(wf.step(), Some(Step::Photos));
    }

    #[test]
    fn test_previous_keeps_data_and_stops_at_start() {
        let mut wf = at_review();
        assert_eq!(wf.previous(), Transition::Moved(Step::Details));
        assert_eq!(wf.previous(), Transition::Moved(Step::Photos));
        assert_eq!(wf.previous(), Transition::Moved(Step::BasicInfo));
        assert_eq!(wf.previous(), Transition::Ignored);
        assert_eq!(wf.draft().location, "Wellington");
        assert_eq!(wf.draft().images().len(), 1);
    }

    #[test]
    fn test_next_is_noop_at_review() {
        let mut wf = at_review();
        assert_eq!(wf.next(), Transition::Ignored);
        assert_eq!(wf.step(), Some(Step::Review));
    }

    #[test]
    fn test_submit_only_from_review() {
        let mut repo = MemoryRepository::default();
        let mut wf = ListingWorkflow::new();
        fill_basic(&mut wf);
        assert_eq!(wf.submit(&mut repo).unwrap(), SubmitOutcome::Ignored);
        assert!(repo.items.is_empty());
    }

    #[test]
    fn test_submit_success_is_terminal() {
        let mut repo = MemoryRepository::default();
        let mut wf = at_review();
        let outcome = wf.submit(&mut repo).unwrap();
        let SubmitOutcome::Submitted(item) = outcome else {
            panic!("expected submission, got {:?}", outcome);
        };
        assert_eq!(item.title, "X");
        assert_eq!(
            wf.state(),
            &WorkflowState::Submitted {
                item_id: "1".into()
            }
        );
        assert!(wf.draft_mut().is_none());
        assert_eq!(wf.previous(), Transition::Ignored);
        assert_eq!(wf.submit(&mut repo).unwrap(), SubmitOutcome::Ignored);
        assert_eq!(repo.items.len(), 1);
    }

    #[test]
    fn test_submit_failure_stays_at_review() {
        let mut repo = MemoryRepository::default();
        repo.fail_with = Some("network down".into());
        let mut wf = at_review();
        assert!(wf.submit(&mut repo).is_err());
        assert_eq!(wf.step(), Some(Step::Review));
        assert_eq!(wf.draft().title, "X");

        repo.fail_with = None;
        assert!(matches!(wf.submit(&mut repo).unwrap(), SubmitOutcome::Submitted(_)));
    }

    #[test]
    fn test_submit_rechecks_earlier_steps() {
        let mut repo = MemoryRepository::default();
        let mut wf = at_review();
        wf.draft_mut().unwrap().remove_image(0);
        assert_eq!(
            wf.submit(&mut repo).unwrap(),
            SubmitOutcome::Gated(vec![DraftField::Images])
        );
        assert_eq!(wf.step(), Some(Step::Review));
    }

    #[test]
    fn test_abandon_drops_draft_and_ignores_late_calls() {
        let mut repo = MemoryRepository::default();
        let mut wf = at_review();
        wf.abandon();
        assert_eq!(wf.state(), &WorkflowState::Abandoned);
        assert_eq!(wf.draft().title, "");
        assert_eq!(wf.next(), Transition::Ignored);
        assert_eq!(wf.submit(&mut repo).unwrap(), SubmitOutcome::Ignored);
        assert!(repo.items.is_empty());
    }

    #[test]
    fn test_step_navigation_helpers() {
        assert_eq!(Step::BasicInfo.previous(), None);
        assert_eq!(Step::Review.next(), None);
        assert_eq!(Step::Details.number(), 3);
        assert!(Step::Review.required_fields().is_empty());
    }
}
