//! Terminal front-end: walks one interview from setup to results against a
//! running proxy backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::models::interview::{Difficulty, InterviewCategory};
use crate::results::scoring::ScoreBand;
use crate::results::summary::{summarize, ResultsSummary};
use crate::session::client::HttpInterviewApi;
use crate::session::controller::{format_countdown, SubmitOutcome, SubmitRejection};
use crate::session::flow::{AppFlow, FlowEvent};
use crate::session::runner::SessionRunner;
use crate::session::setup::{InterviewConfig, DURATION_OPTIONS, QUESTION_COUNT_OPTIONS};

const QUIT: &str = "/quit";

#[derive(Debug, Args)]
pub struct PracticeArgs {
    /// Base URL of the interview API backend
    #[arg(long, env = "INTERVIEW_SERVER_URL", default_value = "http://localhost:4000")]
    pub server: String,

    /// Session length in minutes (15, 30, 45 or 60)
    #[arg(long, default_value_t = 30, value_parser = duration_option)]
    pub duration: u32,

    /// technical, behavioral or mixed
    #[arg(long, default_value = "mixed")]
    pub category: InterviewCategory,

    /// easy, medium or hard
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Number of questions (3, 5, 7 or 10)
    #[arg(long = "questions", default_value_t = 5, value_parser = question_count_option)]
    pub num_questions: u32,

    /// Job role the questions should target
    #[arg(long)]
    pub job_role: Option<String>,

    /// Company the questions should target
    #[arg(long)]
    pub company: Option<String>,
}

fn duration_option(s: &str) -> Result<u32, String> {
    one_of(s, &DURATION_OPTIONS)
}

fn question_count_option(s: &str) -> Result<u32, String> {
    one_of(s, &QUESTION_COUNT_OPTIONS)
}

fn one_of(s: &str, options: &[u32]) -> Result<u32, String> {
    let value: u32 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if options.contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be one of {options:?}"))
    }
}

impl PracticeArgs {
    fn to_config(&self) -> InterviewConfig {
        InterviewConfig {
            duration: self.duration,
            category: self.category,
            difficulty: self.difficulty,
            job_role: self.job_role.clone(),
            company: self.company.clone(),
            num_questions: self.num_questions,
        }
    }
}

pub async fn run(args: PracticeArgs) -> Result<()> {
    let flow = AppFlow::Home.apply(FlowEvent::StartInterview)?;

    let mut config = args.to_config();
    if config.reconcile_category() {
        println!(
            "'{}' interviews don't fit that role; using '{}' instead.",
            args.category, config.category
        );
    }
    config.validate()?;

    println!(
        "Interview: {} min - {} questions - {} - difficulty {}",
        config.duration,
        config.num_questions,
        config.category,
        config.difficulty.as_str().to_uppercase()
    );

    let flow = flow.apply(FlowEvent::SetupComplete(config.clone()))?;
    let api = Arc::new(HttpInterviewApi::new(&args.server).context("Failed to build HTTP client")?);
    let mut runner = SessionRunner::new(config, api);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match runner.start().await {
            Ok(count) => {
                println!("Loaded {count} questions. Type {QUIT} to finish early.\n");
                break;
            }
            Err(e) => {
                println!("{e}");
                println!("Press Enter to retry, or type {QUIT} to go back.");
                match lines.next_line().await? {
                    Some(line) if line.trim() != QUIT => continue,
                    _ => {
                        flow.apply(FlowEvent::BackToHome)?;
                        return Ok(());
                    }
                }
            }
        }
    }

    while !runner.is_completed() {
        show_current_question(&runner).await;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = runner.finished() => {
                println!("\nTime is up!");
                break;
            }
        };

        let Some(line) = line.filter(|l| l.trim() != QUIT) else {
            runner.end_now().await;
            break;
        };

        let Some(outcome) = runner.submit_until_finished(&line).await else {
            println!("\nTime is up!");
            break;
        };

        match outcome {
            SubmitOutcome::Rejected(SubmitRejection::EmptyAnswer) => {
                println!("Type an answer first.");
            }
            SubmitOutcome::Rejected(_) | SubmitOutcome::Discarded => {}
            SubmitOutcome::Failed => {
                let controller = runner.controller().lock().await;
                if let Some(message) = controller.last_error() {
                    println!("{message}");
                }
            }
            SubmitOutcome::Advanced { .. } | SubmitOutcome::Completed => {
                let controller = runner.controller().lock().await;
                if let Some(feedback) = controller.last_feedback() {
                    println!("Feedback: {feedback}\n");
                }
            }
        }
    }

    let session = runner.finished().await;
    if let AppFlow::Results(session) = flow.apply(FlowEvent::InterviewComplete(session))? {
        print_summary(&summarize(&session));
    }
    Ok(())
}

async fn show_current_question(runner: &SessionRunner) {
    let controller = runner.controller().lock().await;
    let Some(question) = controller.current_question() else {
        return;
    };
    println!(
        "[{}] Question {}/{} ({} | {})",
        format_countdown(controller.seconds_left()),
        controller.current_index() + 1,
        controller.session().questions.len(),
        question.category.as_str(),
        question.difficulty,
    );
    println!("{}", question.text);
}

fn print_summary(summary: &ResultsSummary) {
    let label = match summary.band {
        ScoreBand::Excellent => "excellent",
        ScoreBand::Good => "good",
        ScoreBand::NeedsWork => "needs work",
    };

    println!("\n=== Interview Complete ===");
    println!("Overall score:       {} ({label})", summary.overall_score);
    println!(
        "Questions answered:  {}/{}",
        summary.answered_count, summary.questions_count
    );
    println!("Duration:            {}m", summary.duration_minutes);
    println!("\n{}\n", summary.overall_assessment);

    for review in &summary.reviews {
        println!(
            "Q{} {}",
            review.number,
            review.question_text.as_deref().unwrap_or("(unknown question)")
        );
        println!("  Your answer: {}", review.answer);
        if let Some(feedback) = &review.feedback {
            println!("  Feedback:    {feedback}");
        }
    }
}
