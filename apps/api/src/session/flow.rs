//! Screen-level state machine: home → setup → interview → results.

use thiserror::Error;

use crate::models::interview::InterviewSession;
use crate::session::setup::InterviewConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum AppFlow {
    Home,
    Setup,
    Interview(InterviewConfig),
    Results(InterviewSession),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    StartInterview,
    SetupComplete(InterviewConfig),
    InterviewComplete(InterviewSession),
    NewInterview,
    BackToHome,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot apply {event} while on the {screen} screen")]
pub struct FlowError {
    pub screen: &'static str,
    pub event: &'static str,
}

impl AppFlow {
    pub fn screen(&self) -> &'static str {
        match self {
            AppFlow::Home => "home",
            AppFlow::Setup => "setup",
            AppFlow::Interview(_) => "interview",
            AppFlow::Results(_) => "results",
        }
    }

    /// Applies `event`, returning the next screen. `BackToHome` is valid from
    /// anywhere and discards any config or session held by the current screen.
    pub fn apply(self, event: FlowEvent) -> Result<AppFlow, FlowError> {
        match (self, event) {
            (_, FlowEvent::BackToHome) => Ok(AppFlow::Home),
            (AppFlow::Home, FlowEvent::StartInterview) => Ok(AppFlow::Setup),
            (AppFlow::Setup, FlowEvent::SetupComplete(config)) => Ok(AppFlow::Interview(config)),
            (AppFlow::Interview(_), FlowEvent::InterviewComplete(session)) => {
                Ok(AppFlow::Results(session))
            }
            (AppFlow::Results(_), FlowEvent::NewInterview) => Ok(AppFlow::Setup),
            (state, event) => Err(FlowError {
                screen: state.screen(),
                event: event.name(),
            }),
        }
    }
}

impl FlowEvent {
    fn name(&self) -> &'static str {
        match self {
            FlowEvent::StartInterview => "start-interview",
            FlowEvent::SetupComplete(_) => "setup-complete",
            FlowEvent::InterviewComplete(_) => "interview-complete",
            FlowEvent::NewInterview => "new-interview",
            FlowEvent::BackToHome => "back-to-home",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_happy_path() {
        let config = InterviewConfig::default();
        let session = InterviewSession::new(Utc::now());

        let flow = AppFlow::Home
            .apply(FlowEvent::StartInterview)
            .and_then(|f| f.apply(FlowEvent::SetupComplete(config.clone())))
            .unwrap();
        assert_eq!(flow, AppFlow::Interview(config));

        let flow = flow
            .apply(FlowEvent::InterviewComplete(session.clone()))
            .unwrap();
        assert_eq!(flow, AppFlow::Results(session));

        let flow = flow.apply(FlowEvent::NewInterview).unwrap();
        assert_eq!(flow, AppFlow::Setup);
    }

    #[test]
    fn test_back_to_home_from_anywhere() {
        let screens = [
            AppFlow::Home,
            AppFlow::Setup,
            AppFlow::Interview(InterviewConfig::default()),
            AppFlow::Results(InterviewSession::new(Utc::now())),
        ];
        for screen in screens {
            assert_eq!(screen.apply(FlowEvent::BackToHome).unwrap(), AppFlow::Home);
        }
    }

    #[test]
    fn test_invalid_transitions() {
        let err = AppFlow::Home
            .apply(FlowEvent::InterviewComplete(InterviewSession::new(Utc::now())))
            .unwrap_err();
        assert_eq!(err.screen, "home");
        assert_eq!(err.event, "interview-complete");

        assert!(AppFlow::Setup.apply(FlowEvent::NewInterview).is_err());
        assert!(AppFlow::Interview(InterviewConfig::default())
            .apply(FlowEvent::SetupComplete(InterviewConfig::default()))
            .is_err());
    }
}
