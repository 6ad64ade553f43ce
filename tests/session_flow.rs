use std::fs;
use std::rc::Rc;
use std::time::{Duration, Instant};

use deckr::deck::LessonRef;
use deckr::session::controller::{Dispatch, Handoff, ReviewController, Timings};
use deckr::session::report::{CompletionReport, Tier, classify};
use deckr::session::selector::{DeckSelector, PracticeMode};
use deckr::session::state::{Face, Verdict};

const GREETINGS: &str = r#"{
    "title": "Greetings",
    "cards": [
        {"front": "こんにちは", "aux": "konnichiwa", "back": "Xin chào"}
    ]
}"#;

const FIVE_CARDS: &str = r#"[
    {"front": "一", "back": "one"},
    {"front": "二", "back": "two"},
    {"front": "三", "back": "three"},
    {"front": "四", "back": "four"},
    {"front": "五", "back": "five"}
]"#;

fn handoff_from(json: &str) -> (Handoff, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lesson.json");
    fs::write(&path, json).unwrap();

    let mut selector = DeckSelector::new(vec![LessonRef::File(path)], false);
    selector.load();
    let handoff = selector.select_mode(PracticeMode::Flashcard, None).unwrap();
    (handoff, dir)
}

fn started(handoff: Handoff) -> ReviewController {
    let now = Instant::now();
    let mut review = ReviewController::new(handoff, Timings::instant(), now).unwrap();
    review.tick(now);
    assert!(!review.is_loading());
    review
}

fn run(review: &mut ReviewController, verdicts: &[Verdict]) {
    let now = Instant::now();
    for verdict in verdicts {
        assert_eq!(review.flip(now), Dispatch::Applied);
        assert_eq!(review.judge(*verdict, now), Dispatch::Applied);
    }
}

#[test]
fn single_card_known_scores_full_marks() {
    let (handoff, _dir) = handoff_from(GREETINGS);
    assert_eq!(handoff.title, "Greetings");
    let mut review = started(handoff);

    let card = review.current_card().unwrap();
    assert_eq!(card.front, "こんにちは");
    assert_eq!(card.aux.as_deref(), Some("konnichiwa"));
    assert_eq!(review.state().unwrap().face, Face::Front);

    run(&mut review, &[Verdict::Correct]);

    let result = review.result().unwrap();
    assert_eq!(result.correct, 1);
    assert_eq!(result.wrong, 0);
    assert_eq!(result.total_cards, 1);
    assert_eq!(result.accuracy, 100);
    assert_eq!(classify(result.accuracy), Tier::Excellent);
}

#[test]
fn mixed_session_reports_sixty_percent() {
    let (handoff, _dir) = handoff_from(FIVE_CARDS);
    let mut review = started(handoff);

    run(
        &mut review,
        &[
            Verdict::Correct,
            Verdict::Correct,
            Verdict::Wrong,
            Verdict::Correct,
            Verdict::Wrong,
        ],
    );

    let result = review.result().unwrap().clone();
    assert_eq!((result.correct, result.wrong, result.total_cards), (3, 2, 5));
    assert_eq!(result.accuracy, 60);

    let report = CompletionReport::new(result, Rc::clone(review.deck()));
    assert_eq!(report.tier, Tier::Fair);
}

#[test]
fn tier_boundaries_around_seventy() {
    assert_eq!(classify(60), Tier::Fair);
    assert_eq!(classify(69), Tier::Fair);
    assert_eq!(classify(70), Tier::Good);
}

#[test]
fn restart_replays_same_deck_from_scratch() {
    let (handoff, _dir) = handoff_from(FIVE_CARDS);
    let mut review = started(handoff);
    run(
        &mut review,
        &[
            Verdict::Correct,
            Verdict::Correct,
            Verdict::Wrong,
            Verdict::Correct,
            Verdict::Wrong,
        ],
    );
    let deck_before = Rc::clone(review.deck());
    let report = CompletionReport::new(review.result().unwrap().clone(), Rc::clone(&deck_before));

    let now = Instant::now();
    review.accept(report.restart(), now).unwrap();
    assert!(review.is_loading());
    review.tick(now);

    let state = review.state().unwrap();
    assert_eq!((state.cursor, state.correct, state.wrong), (0, 0, 0));
    assert_eq!(state.face, Face::Front);
    assert!(Rc::ptr_eq(review.deck(), &deck_before));
    assert_eq!(review.deck().len(), 5);
    assert_eq!(review.current_card().unwrap().front, "一");
}

#[test]
fn loading_pause_holds_until_delay_elapses() {
    let (handoff, _dir) = handoff_from(FIVE_CARDS);
    let timings = Timings {
        loading_delay: Duration::from_millis(500),
        flip: Duration::from_millis(200),
        swipe: Duration::from_millis(300),
    };
    let start = Instant::now();
    let mut review = ReviewController::new(handoff, timings, start).unwrap();

    review.tick(start + Duration::from_millis(100));
    assert!(review.is_loading());
    assert_eq!(review.judge(Verdict::Correct, start), Dispatch::Ignored);

    review.tick(start + Duration::from_millis(500));
    assert!(!review.is_loading());
}

#[test]
fn rapid_double_judge_counts_once() {
    let (handoff, _dir) = handoff_from(FIVE_CARDS);
    let timings = Timings {
        loading_delay: Duration::ZERO,
        flip: Duration::from_millis(200),
        swipe: Duration::from_millis(300),
    };
    let now = Instant::now();
    let mut review = ReviewController::new(handoff, timings, now).unwrap();
    review.tick(now);

    assert_eq!(review.judge(Verdict::Correct, now), Dispatch::Applied);
    assert_eq!(
        review.judge(Verdict::Correct, now + Duration::from_millis(50)),
        Dispatch::Gated
    );
    let state = review.state().unwrap();
    assert_eq!((state.cursor, state.correct), (1, 1));

    let later = now + Duration::from_millis(300);
    assert_eq!(review.judge(Verdict::Wrong, later), Dispatch::Applied);
    assert_eq!(review.state().unwrap().wrong, 1);
}

#[test]
fn empty_lesson_cannot_start_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, r#"{"title": "Nothing", "cards": []}"#).unwrap();

    let mut selector = DeckSelector::new(vec![LessonRef::File(path)], false);
    selector.load();
    assert!(!selector.can_launch());
    assert!(selector.select_mode(PracticeMode::Flashcard, None).is_err());
}
