//! crates/stylist_core/src/survey.rs
//!
//! The style-preference survey, modelled as an explicit state machine:
//! a tagged state enum plus a transition function `(state, event) ->
//! (state, effects)`. The machine is pure — it knows nothing about the
//! chat transport or persistence. Prompts are emitted as symbolic
//! `PromptKind`s and side effects as `SurveyEffect`s; rendering localized
//! text and executing the effects is the caller's job.

use crate::domain::StyleProfile;
use crate::normalize::{normalize_answer, normalize_input};

/// The enumerated clothing sizes offered by the survey. Matching is
/// case-insensitive; the canonical casing below is what gets stored.
pub const ALLOWED_SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];

/// The enumerated fashion styles offered by the survey.
pub const ALLOWED_STYLES: [&str; 4] = ["Casual", "Smart Casual", "Classic", "Sporty"];

const CONFIRM_ANSWERS: [&str; 2] = ["підтверджую", "confirm"];
const YES_ANSWERS: [&str; 2] = ["так", "yes"];
const DONE_ANSWERS: [&str; 2] = ["готово", "done"];

/// The survey states, in question order. `AskUpload` and `PhotoUpload`
/// form the optional wardrobe-upload tail after confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyState {
    Size,
    Style,
    Colors,
    Brands,
    Height,
    Weight,
    Gender,
    Confirm,
    AskUpload,
    PhotoUpload,
}

/// An inbound event consumed by the machine.
#[derive(Debug, Clone)]
pub enum SurveyEvent {
    Text(String),
    /// A photo message; only meaningful in `PhotoUpload`.
    Photo,
}

/// A symbolic outbound prompt. The service layer maps each kind to
/// localized text plus an optional reply keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    AskSize,
    InvalidSize,
    AskStyle,
    InvalidStyle,
    AskColors,
    AskBrands,
    AskHeight,
    AskWeight,
    AskGender,
    /// The full answers recap shown before confirmation.
    Summary(StyleProfile),
    SurveySaved,
    SurveyCancelled,
    SendPhotos,
    UploadSkipped,
    WardrobeDone,
}

/// A side effect requested by a transition, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyEffect {
    Prompt(PromptKind),
    /// Persist the accumulated answers and mark the survey completed.
    SaveProfile(StyleProfile),
    /// Route the pending photo into the wardrobe ingestion pipeline.
    IngestPhoto,
}

/// The outcome of one transition.
#[derive(Debug, Clone)]
pub struct Step {
    pub effects: Vec<SurveyEffect>,
    /// True when the machine has reached a terminal state and the session
    /// should be dropped.
    pub done: bool,
}

impl Step {
    fn stay(effects: Vec<SurveyEffect>) -> Self {
        Self {
            effects,
            done: false,
        }
    }

    fn finish(effects: Vec<SurveyEffect>) -> Self {
        Self {
            effects,
            done: true,
        }
    }
}

/// The answers collected so far. All fields are filled by the time the
/// machine reaches `Confirm`.
#[derive(Debug, Clone, Default)]
pub struct SurveyAnswers {
    pub size: Option<String>,
    pub style: Option<String>,
    pub colors: Option<String>,
    pub brands: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub gender: Option<String>,
}

impl SurveyAnswers {
    fn profile(&self) -> StyleProfile {
        StyleProfile {
            size: self.size.clone().unwrap_or_default(),
            style: self.style.clone().unwrap_or_default(),
            colors: self.colors.clone().unwrap_or_default(),
            brands: self.brands.clone().unwrap_or_default(),
            height: self.height.clone().unwrap_or_default(),
            weight: self.weight.clone().unwrap_or_default(),
            gender: self.gender.clone().unwrap_or_default(),
        }
    }
}

/// One in-progress survey for one user. Ephemeral: held in memory for the
/// lifetime of the conversation and lost on restart.
#[derive(Debug, Clone)]
pub struct SurveySession {
    pub state: SurveyState,
    pub answers: SurveyAnswers,
}

impl SurveySession {
    /// Starts a fresh survey, returning the session and the opening prompt.
    pub fn start() -> (Self, Vec<SurveyEffect>) {
        let session = Self {
            state: SurveyState::Size,
            answers: SurveyAnswers::default(),
        };
        let effects = vec![SurveyEffect::Prompt(PromptKind::AskSize)];
        (session, effects)
    }

    /// The transition function. Consumes one event, mutates the state and
    /// returns the effects to execute plus whether the survey is finished.
    pub fn advance(&mut self, event: &SurveyEvent) -> Step {
        match self.state {
            SurveyState::Size => self.on_size(event),
            SurveyState::Style => self.on_style(event),
            SurveyState::Colors => self.on_free_text(
                event,
                PromptKind::AskColors,
                PromptKind::AskBrands,
                SurveyState::Brands,
                |answers, text| answers.colors = Some(text),
            ),
            SurveyState::Brands => self.on_free_text(
                event,
                PromptKind::AskBrands,
                PromptKind::AskHeight,
                SurveyState::Height,
                |answers, text| answers.brands = Some(text),
            ),
            SurveyState::Height => self.on_free_text(
                event,
                PromptKind::AskHeight,
                PromptKind::AskWeight,
                SurveyState::Weight,
                |answers, text| answers.height = Some(text),
            ),
            SurveyState::Weight => self.on_free_text(
                event,
                PromptKind::AskWeight,
                PromptKind::AskGender,
                SurveyState::Gender,
                |answers, text| answers.weight = Some(text),
            ),
            SurveyState::Gender => self.on_gender(event),
            SurveyState::Confirm => self.on_confirm(event),
            SurveyState::AskUpload => self.on_ask_upload(event),
            SurveyState::PhotoUpload => self.on_photo_upload(event),
        }
    }

    fn on_size(&mut self, event: &SurveyEvent) -> Step {
        let Some(text) = event_text(event) else {
            return Step::stay(vec![]);
        };
        match match_option(text, &ALLOWED_SIZES) {
            Some(size) => {
                self.answers.size = Some(size.to_string());
                self.state = SurveyState::Style;
                Step::stay(vec![SurveyEffect::Prompt(PromptKind::AskStyle)])
            }
            None => Step::stay(vec![SurveyEffect::Prompt(PromptKind::InvalidSize)]),
        }
    }

    fn on_style(&mut self, event: &SurveyEvent) -> Step {
        let Some(text) = event_text(event) else {
            return Step::stay(vec![]);
        };
        match match_option(text, &ALLOWED_STYLES) {
            Some(style) => {
                self.answers.style = Some(style.to_string());
                self.state = SurveyState::Colors;
                Step::stay(vec![SurveyEffect::Prompt(PromptKind::AskColors)])
            }
            None => Step::stay(vec![SurveyEffect::Prompt(PromptKind::InvalidStyle)]),
        }
    }

    /// Shared handler for the four free-text questions: any non-empty
    /// trimmed answer is stored verbatim.
    fn on_free_text(
        &mut self,
        event: &SurveyEvent,
        reprompt: PromptKind,
        next_prompt: PromptKind,
        next_state: SurveyState,
        store: fn(&mut SurveyAnswers, String),
    ) -> Step {
        let Some(text) = event_text(event) else {
            return Step::stay(vec![]);
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Step::stay(vec![SurveyEffect::Prompt(reprompt)]);
        }
        store(&mut self.answers, trimmed.to_string());
        self.state = next_state;
        Step::stay(vec![SurveyEffect::Prompt(next_prompt)])
    }

    fn on_gender(&mut self, event: &SurveyEvent) -> Step {
        let Some(text) = event_text(event) else {
            return Step::stay(vec![]);
        };
        let normalized = normalize_answer(text);
        if normalized.is_empty() {
            return Step::stay(vec![SurveyEffect::Prompt(PromptKind::AskGender)]);
        }
        self.answers.gender = Some(normalized);
        self.state = SurveyState::Confirm;
        Step::stay(vec![SurveyEffect::Prompt(PromptKind::Summary(
            self.answers.profile(),
        ))])
    }

    fn on_confirm(&mut self, event: &SurveyEvent) -> Step {
        let Some(text) = event_text(event) else {
            return Step::stay(vec![]);
        };
        let normalized = normalize_answer(text);
        if CONFIRM_ANSWERS.contains(&normalized.as_str()) {
            self.state = SurveyState::AskUpload;
            Step::stay(vec![
                SurveyEffect::SaveProfile(self.answers.profile()),
                SurveyEffect::Prompt(PromptKind::SurveySaved),
            ])
        } else {
            // Anything but an explicit confirmation discards the answers.
            Step::finish(vec![SurveyEffect::Prompt(PromptKind::SurveyCancelled)])
        }
    }

    fn on_ask_upload(&mut self, event: &SurveyEvent) -> Step {
        let Some(text) = event_text(event) else {
            return Step::stay(vec![]);
        };
        let normalized = normalize_answer(text);
        if YES_ANSWERS.contains(&normalized.as_str()) {
            self.state = SurveyState::PhotoUpload;
            Step::stay(vec![SurveyEffect::Prompt(PromptKind::SendPhotos)])
        } else {
            Step::finish(vec![SurveyEffect::Prompt(PromptKind::UploadSkipped)])
        }
    }

    fn on_photo_upload(&mut self, event: &SurveyEvent) -> Step {
        match event {
            // The state is re-entered after each photo so the user can keep
            // uploading until an explicit "done".
            SurveyEvent::Photo => Step::stay(vec![SurveyEffect::IngestPhoto]),
            SurveyEvent::Text(text) => {
                let normalized = normalize_answer(text);
                if DONE_ANSWERS.contains(&normalized.as_str()) {
                    Step::finish(vec![SurveyEffect::Prompt(PromptKind::WardrobeDone)])
                } else {
                    Step::stay(vec![SurveyEffect::Prompt(PromptKind::SendPhotos)])
                }
            }
        }
    }
}

fn event_text(event: &SurveyEvent) -> Option<&str> {
    match event {
        SurveyEvent::Text(text) => Some(text.as_str()),
        // A photo outside PhotoUpload is ignored; the state is unchanged.
        SurveyEvent::Photo => None,
    }
}

/// Case-insensitive, trimmed exact match against an option set, returning
/// the canonical spelling on success.
fn match_option<'a>(input: &str, allowed: &[&'a str]) -> Option<&'a str> {
    let normalized = normalize_input(input);
    allowed
        .iter()
        .find(|option| option.to_lowercase() == normalized)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> SurveyEvent {
        SurveyEvent::Text(s.to_string())
    }

    fn prompts(step: &Step) -> Vec<&PromptKind> {
        step.effects
            .iter()
            .filter_map(|e| match e {
                SurveyEffect::Prompt(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_asks_for_size() {
        let (session, effects) = SurveySession::start();
        assert_eq!(session.state, SurveyState::Size);
        assert_eq!(effects, vec![SurveyEffect::Prompt(PromptKind::AskSize)]);
    }

    #[test]
    fn size_accepts_case_insensitive_trimmed_input() {
        let (mut session, _) = SurveySession::start();
        let step = session.advance(&text("  xl "));
        assert!(!step.done);
        assert_eq!(session.state, SurveyState::Style);
        assert_eq!(session.answers.size.as_deref(), Some("XL"));
    }

    #[test]
    fn invalid_size_reprompts_without_advancing() {
        let (mut session, _) = SurveySession::start();
        for _ in 0..3 {
            let step = session.advance(&text("gigantic"));
            assert!(!step.done);
            assert_eq!(prompts(&step), vec![&PromptKind::InvalidSize]);
            assert_eq!(session.state, SurveyState::Size);
        }
        assert!(session.answers.size.is_none());
    }

    #[test]
    fn invalid_style_reprompts_without_advancing() {
        let (mut session, _) = SurveySession::start();
        session.advance(&text("M"));
        let step = session.advance(&text("baroque"));
        assert_eq!(prompts(&step), vec![&PromptKind::InvalidStyle]);
        assert_eq!(session.state, SurveyState::Style);
    }

    #[test]
    fn height_and_weight_accept_free_text() {
        let (mut session, _) = SurveySession::start();
        session.advance(&text("M"));
        session.advance(&text("Casual"));
        session.advance(&text("no red"));
        session.advance(&text("Nike"));
        session.advance(&text("about one eighty"));
        session.advance(&text("75 kg or so"));
        assert_eq!(session.answers.height.as_deref(), Some("about one eighty"));
        assert_eq!(session.answers.weight.as_deref(), Some("75 kg or so"));
        assert_eq!(session.state, SurveyState::Gender);
    }

    #[test]
    fn empty_colors_answer_reprompts() {
        let (mut session, _) = SurveySession::start();
        session.advance(&text("M"));
        session.advance(&text("Casual"));
        let step = session.advance(&text("   "));
        assert_eq!(prompts(&step), vec![&PromptKind::AskColors]);
        assert_eq!(session.state, SurveyState::Colors);
    }

    #[test]
    fn gender_is_normalized_before_storage() {
        let mut session = filled_to_gender();
        session.advance(&text(" Male! "));
        assert_eq!(session.answers.gender.as_deref(), Some("male"));
        assert_eq!(session.state, SurveyState::Confirm);
    }

    #[test]
    fn summary_carries_the_collected_profile() {
        let mut session = filled_to_gender();
        let step = session.advance(&text("male"));
        match prompts(&step).as_slice() {
            [PromptKind::Summary(profile)] => {
                assert_eq!(profile.size, "M");
                assert_eq!(profile.style, "Casual");
                assert_eq!(profile.colors, "no red");
                assert_eq!(profile.brands, "Nike");
                assert_eq!(profile.height, "180");
                assert_eq!(profile.weight, "75");
                assert_eq!(profile.gender, "male");
            }
            other => panic!("expected a summary prompt, got {other:?}"),
        }
    }

    #[test]
    fn confirm_emits_save_then_asks_about_upload() {
        let mut session = filled_to_confirm();
        let step = session.advance(&text("Confirm"));
        assert!(!step.done);
        assert_eq!(session.state, SurveyState::AskUpload);
        assert!(matches!(
            step.effects[0],
            SurveyEffect::SaveProfile(ref p) if p.size == "M" && p.gender == "male"
        ));
        assert_eq!(
            step.effects[1],
            SurveyEffect::Prompt(PromptKind::SurveySaved)
        );
    }

    #[test]
    fn anything_but_confirm_cancels_the_survey() {
        let mut session = filled_to_confirm();
        let step = session.advance(&text("actually no"));
        assert!(step.done);
        assert_eq!(prompts(&step), vec![&PromptKind::SurveyCancelled]);
        assert!(!step
            .effects
            .iter()
            .any(|e| matches!(e, SurveyEffect::SaveProfile(_))));
    }

    #[test]
    fn declining_upload_finishes_the_survey() {
        let mut session = filled_to_confirm();
        session.advance(&text("confirm"));
        let step = session.advance(&text("ні"));
        assert!(step.done);
        assert_eq!(prompts(&step), vec![&PromptKind::UploadSkipped]);
    }

    #[test]
    fn photo_loop_ingests_and_stays_until_done() {
        let mut session = filled_to_confirm();
        session.advance(&text("confirm"));
        session.advance(&text("так"));
        assert_eq!(session.state, SurveyState::PhotoUpload);

        for _ in 0..3 {
            let step = session.advance(&SurveyEvent::Photo);
            assert!(!step.done);
            assert_eq!(step.effects, vec![SurveyEffect::IngestPhoto]);
            assert_eq!(session.state, SurveyState::PhotoUpload);
        }

        let step = session.advance(&text("Готово"));
        assert!(step.done);
        assert_eq!(prompts(&step), vec![&PromptKind::WardrobeDone]);
    }

    #[test]
    fn stray_text_during_photo_upload_reprompts() {
        let mut session = filled_to_confirm();
        session.advance(&text("confirm"));
        session.advance(&text("yes"));
        let step = session.advance(&text("what now?"));
        assert!(!step.done);
        assert_eq!(prompts(&step), vec![&PromptKind::SendPhotos]);
    }

    #[test]
    fn photo_outside_photo_upload_is_ignored() {
        let (mut session, _) = SurveySession::start();
        let step = session.advance(&SurveyEvent::Photo);
        assert!(step.effects.is_empty());
        assert!(!step.done);
        assert_eq!(session.state, SurveyState::Size);
    }

    fn filled_to_gender() -> SurveySession {
        let (mut session, _) = SurveySession::start();
        session.advance(&text("M"));
        session.advance(&text("Casual"));
        session.advance(&text("no red"));
        session.advance(&text("Nike"));
        session.advance(&text("180"));
        session.advance(&text("75"));
        session
    }

    fn filled_to_confirm() -> SurveySession {
        let mut session = filled_to_gender();
        session.advance(&text("male"));
        session
    }
}
