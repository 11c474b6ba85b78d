use serde::{Deserialize, Serialize};

/// Number of steps in the onboarding flow. `current_step` may equal this
/// value once the last step has been passed.
pub const ONBOARDING_STEPS: u32 = 5;

/// Onboarding progress, persisted under [`ONBOARDING_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    pub completed: bool,
    pub current_step: u32,
    #[serde(default)]
    pub dismissed_tips: Vec<String>,
}

pub const ONBOARDING_KEY: &str = "onboarding";
