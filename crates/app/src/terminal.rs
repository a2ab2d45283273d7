//! Terminal front end: prompts, feedback and the completed screen.

use std::io::{self, BufRead, IsTerminal, Write};

use quiz_core::countdown::{Countdown, format_elapsed};
use quiz_core::model::{DailyResult, QuizSession, Submission};
use services::{DailyQuizService, QuizState, countdown_ticker, elapsed_ticker};
use services::StoredResult;

/// Run today's quiz, or show the locked screen if it is already done.
pub async fn play(quiz: &DailyQuizService) -> Result<(), Box<dyn std::error::Error>> {
    match quiz.open().await? {
        QuizState::InProgress(session) => run_session(quiz, session).await,
        QuizState::Completed { result, countdown } => {
            print!("{}", render_completed(&result, countdown));
            Ok(())
        }
        QuizState::NotStarted => Ok(()),
    }
}

async fn run_session(
    quiz: &DailyQuizService,
    session: QuizSession,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("📝 Daily Quiz - {} Words", session.len());
    println!("Type der, die, das or plural for each word.\n");

    let show_timer = io::stdout().is_terminal();
    let timer = elapsed_ticker(session.elapsed_seconds(quiz.clock().now()), move |secs| {
        if show_timer {
            set_title(&format!("Daily Quiz · Time: {}", format_elapsed(secs)));
        }
    });

    let words: Vec<String> = session
        .entries()
        .iter()
        .map(|e| e.word().to_owned())
        .collect();
    let answers = tokio::task::spawn_blocking(move || read_answers(&words)).await??;

    timer.stop().await;
    if show_timer {
        set_title("Daily Quiz");
    }

    let submission = quiz.submit_answers(session, &answers).await?;
    print!("{}", render_feedback(&submission));
    Ok(())
}

fn read_answers(words: &[String]) -> io::Result<Vec<String>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut answers = Vec::with_capacity(words.len());
    for (i, word) in words.iter().enumerate() {
        print!("  {}. ____ {word}: ", i + 1);
        io::stdout().flush()?;
        // Out of input counts as a blank answer.
        let answer = lines.next().transpose()?.unwrap_or_default();
        answers.push(answer);
    }
    Ok(answers)
}

fn set_title(title: &str) {
    let mut out = io::stdout();
    let _ = write!(out, "\x1b]0;{title}\x07");
    let _ = out.flush();
}

/// Show the countdown until midnight, refreshing every second until the
/// quiz unlocks or the user presses Ctrl-C.
pub async fn watch_countdown(quiz: &DailyQuizService) -> Result<(), Box<dyn std::error::Error>> {
    let ticker = countdown_ticker(quiz.clock(), |left| {
        let mut out = io::stdout();
        let _ = write!(out, "\r{}   ", render_countdown(left));
        let _ = out.flush();
    });
    tokio::select! {
        () = ticker.finished() => println!("\n🎉 A new quiz is ready."),
        res = tokio::signal::ctrl_c() => {
            println!();
            res?;
        }
    }
    Ok(())
}

#[must_use]
pub fn render_countdown(left: Countdown) -> String {
    format!("⏳ Next quiz in: {left}")
}

#[must_use]
pub fn render_feedback(submission: &Submission) -> String {
    let mut out = String::from("\n");
    for item in &submission.feedback {
        if item.is_correct {
            out.push_str(&format!("✅ \"{}\": Correct!\n", item.word));
        } else {
            out.push_str(&format!(
                "❌ \"{}\": Correct answer is \"{}\"\n",
                item.word, item.expected_word
            ));
        }
    }
    out.push_str(&format!(
        "\nYou scored {} out of {} in {}.\n",
        submission.result.score(),
        submission.result.total(),
        format_elapsed(submission.result.elapsed_seconds())
    ));
    out
}

#[must_use]
pub fn render_completed(result: &DailyResult, countdown: Countdown) -> String {
    format!(
        "✅ You've already completed today's quiz!\nScore: {} / {}\nTime: {}\nCome back tomorrow for a new quiz.\n{}\n",
        result.score(),
        result.total(),
        format_elapsed(result.elapsed_seconds()),
        render_countdown(countdown)
    )
}

#[must_use]
pub fn render_history(rows: &[StoredResult]) -> String {
    if rows.is_empty() {
        return "No quizzes recorded yet.\n".to_string();
    }
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{}  {}/{}  {}\n",
            row.day,
            row.result.score(),
            row.result.total(),
            format_elapsed(row.result.elapsed_seconds())
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quiz_core::model::{EntryFeedback, QuizDay};

    fn day() -> QuizDay {
        QuizDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn feedback_lists_each_word_and_the_score() {
        let submission = Submission {
            day: day(),
            result: DailyResult::new(1, 2, 65).unwrap(),
            feedback: vec![
                EntryFeedback {
                    word: "Hund".into(),
                    answer: "der".into(),
                    is_correct: true,
                    expected_word: "der",
                },
                EntryFeedback {
                    word: "Leute".into(),
                    answer: "die".into(),
                    is_correct: false,
                    expected_word: "Plural",
                },
            ],
        };
        let text = render_feedback(&submission);
        assert!(text.contains("✅ \"Hund\": Correct!"));
        assert!(text.contains("❌ \"Leute\": Correct answer is \"Plural\""));
        assert!(text.contains("You scored 1 out of 2 in 1:05."));
    }

    #[test]
    fn completed_screen_shows_score_time_and_countdown() {
        let result = DailyResult::new(4, 5, 42).unwrap();
        let text = render_completed(&result, Countdown::from_seconds(3_725));
        assert!(text.contains("Score: 4 / 5"));
        assert!(text.contains("Time: 0:42"));
        assert!(text.contains("⏳ Next quiz in: 1h 2m 5s"));
    }

    #[test]
    fn history_has_one_line_per_day() {
        let rows = vec![StoredResult {
            day: day(),
            result: DailyResult::new(5, 5, 30).unwrap(),
        }];
        assert_eq!(render_history(&rows), "2024-01-01  5/5  0:30\n");
        assert_eq!(render_history(&[]), "No quizzes recorded yet.\n");
    }
}
