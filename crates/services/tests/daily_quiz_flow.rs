use chrono::{Duration, FixedOffset, TimeZone};
use quiz_core::model::{GenderCode, VocabEntry};
use services::{AppServices, AppServicesError, Clock, QuizError, QuizState};

fn entries(n: usize) -> Vec<VocabEntry> {
    let codes = GenderCode::ALL;
    (0..n)
        .map(|i| VocabEntry::new(format!("Wort{i}"), codes[i % codes.len()]).unwrap())
        .collect()
}

fn morning() -> Clock {
    let offset = FixedOffset::east_opt(3600).unwrap();
    Clock::fixed(offset.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
}

#[tokio::test]
async fn daily_quiz_runs_once_per_day() {
    let app = AppServices::in_memory(entries(12), morning()).unwrap();
    let quiz = app.quiz();

    let QuizState::InProgress(session) = quiz.open().await.unwrap() else {
        panic!("expected a fresh session");
    };
    assert_eq!(session.len(), 5);
    let answers: Vec<_> = session
        .entries()
        .iter()
        .map(|e| e.expected().article().to_lowercase())
        .collect();

    let later = (*quiz).clone().with_clock(morning().advanced(Duration::seconds(95)));
    let submission = later.submit_answers(session, &answers).await.unwrap();
    assert_eq!(submission.result.score(), 5);
    assert_eq!(submission.result.elapsed_seconds(), 95);

    let state = quiz.open().await.unwrap();
    assert_eq!(state.result(), Some(&submission.result));

    // Same day, same words: the stored result is what comes back.
    for _ in 0..3 {
        assert_eq!(
            quiz.has_completed_today().await.unwrap(),
            Some(submission.result)
        );
    }
    assert!(matches!(
        quiz.start_session().await,
        Err(QuizError::AlreadyCompleted(_))
    ));
}

#[tokio::test]
async fn same_day_always_picks_the_same_words() {
    let first = AppServices::in_memory(entries(40), morning()).unwrap();
    let second = AppServices::in_memory(entries(40), morning().advanced(Duration::hours(10))).unwrap();

    let a = first.quiz().start_session().await.unwrap();
    let b = second.quiz().start_session().await.unwrap();
    assert_eq!(a.entries(), b.entries());
}

#[test]
fn short_word_list_fails_at_startup() {
    let err = AppServices::in_memory(entries(4), morning()).err().unwrap();
    assert!(matches!(err, AppServicesError::Sampler(_)));
}
