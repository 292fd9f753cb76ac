pub mod domain;
pub mod history;
pub mod normalize;
pub mod ports;
pub mod survey;

pub use domain::{
    ChatMessage, ChatRole, ContentPart, Keyboard, Registration, StyleProfile, User, WardrobeItem,
};
pub use history::RollingHistory;
pub use ports::{ChatTransport, ImageStorage, LanguageModel, PortError, PortResult, UserStore};
pub use survey::{
    PromptKind, Step, SurveyEffect, SurveyEvent, SurveySession, SurveyState, ALLOWED_SIZES,
    ALLOWED_STYLES,
};
