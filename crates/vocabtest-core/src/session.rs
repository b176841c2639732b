//! Quiz session controller.
//!
//! A [`QuizSession`] owns the loaded vocabulary set for the lifetime of one
//! quiz. It moves between `Running` (choosing the next word),
//! `AwaitingInput` (a question is out) and `Done`. Progress changes are
//! kept in memory and written back by [`QuizSession::finish`], which
//! [`run_session`] calls on every exit path.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;

use crate::category::{Category, VocabularySet, WordProgress};
use crate::error::VocabError;
use crate::selector::{self, CategoryWeights};
use crate::store::{ProgressStore, ProgressSummary};
use crate::traits::{is_candidate, DefinitionMatcher, DictionaryLookup, DEFINITION_UNAVAILABLE};
use crate::transition::{advance, Movement, DEFAULT_PROMOTION_THRESHOLD};

/// Answer that ends a session unless configured otherwise.
pub const DEFAULT_EXIT_TOKEN: &str = "e";

/// Tunables for a quiz session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Consecutive correct answers needed for a promotion.
    pub promotion_threshold: u32,
    /// Base category weights for word selection.
    pub weights: CategoryWeights,
    /// Answer that ends the session without being graded.
    pub exit_token: String,
    /// Upper bound on each matcher or dictionary call.
    pub service_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            promotion_threshold: DEFAULT_PROMOTION_THRESHOLD,
            weights: CategoryWeights::default(),
            exit_token: DEFAULT_EXIT_TOKEN.to_string(),
            service_timeout: Duration::from_secs(10),
        }
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    AwaitingInput,
    Done,
}

/// A word put to the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub word: String,
    pub category: Category,
    /// 1-based position within the session.
    pub number: usize,
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// The matching service could not be consulted; progress is unchanged.
    Ungraded { reason: String },
}

/// What the learner is told after answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub word: String,
    pub verdict: Verdict,
    pub before: WordProgress,
    pub after: WordProgress,
    /// The word's dictionary definition. Withheld on ungraded rounds, where
    /// the same word is asked again.
    pub definition: Option<String>,
}

impl Feedback {
    pub fn movement(&self) -> Movement {
        Movement::between(self.before, self.after)
    }
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Graded(Feedback),
    Exit,
}

/// Totals reported when a session ends.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub set_name: String,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub asked: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub ungraded: usize,
    pub promotions: usize,
    pub demotions: usize,
    /// Category counts after the session.
    pub progress: ProgressSummary,
}

/// Supplies the learner's answers.
pub trait AnswerSource {
    /// Read an answer to `question`. `Ok(None)` means input has ended.
    fn read_answer(&mut self, question: &Question) -> std::io::Result<Option<String>>;
}

/// Receives session events for display.
pub trait SessionReporter {
    fn on_question(&self, question: &Question);
    fn on_feedback(&self, feedback: &Feedback);
    fn on_finish(&self, summary: &SessionSummary);
}

/// Reporter that ignores every event.
pub struct NoopReporter;

impl SessionReporter for NoopReporter {
    fn on_question(&self, _: &Question) {}
    fn on_feedback(&self, _: &Feedback) {}
    fn on_finish(&self, _: &SessionSummary) {}
}

#[derive(Debug, Default)]
struct Tally {
    asked: usize,
    correct: usize,
    incorrect: usize,
    ungraded: usize,
    promotions: usize,
    demotions: usize,
}

/// One quiz over a loaded vocabulary set.
pub struct QuizSession<R> {
    set: VocabularySet,
    config: SessionConfig,
    rng: R,
    state: SessionState,
    pending: Option<Question>,
    tally: Tally,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl<R: Rng> QuizSession<R> {
    /// Start a session. Fails with [`VocabError::NoWordsAvailable`] before
    /// any question if nothing can be selected.
    pub fn start(set: VocabularySet, config: SessionConfig, rng: R) -> Result<Self, VocabError> {
        config.weights.effective(&set.partitions())?;
        tracing::info!(set = set.name(), words = set.len(), "quiz session started");
        Ok(Self {
            set,
            config,
            rng,
            state: SessionState::Running,
            pending: None,
            tally: Tally::default(),
            started_at: Utc::now(),
            started: Instant::now(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn set(&self) -> &VocabularySet {
        &self.set
    }

    /// Select the next word. Returns the outstanding question again if one
    /// is pending, and `None` once the session is done.
    pub fn next_question(&mut self) -> Result<Option<Question>, VocabError> {
        match self.state {
            SessionState::Done => return Ok(None),
            SessionState::AwaitingInput => return Ok(self.pending.clone()),
            SessionState::Running => {}
        }

        let partitions = self.set.partitions();
        let word = selector::select(&partitions, &self.config.weights, &mut self.rng)?;
        let question = Question {
            word: word.to_string(),
            category: self.set.progress(word).category,
            number: self.tally.asked + 1,
        };
        self.pending = Some(question.clone());
        self.state = SessionState::AwaitingInput;
        Ok(Some(question))
    }

    /// Grade an answer to the pending question and update progress in memory.
    ///
    /// The exit token, or an answer with no question pending, ends the
    /// session without grading.
    pub async fn answer(
        &mut self,
        text: &str,
        matcher: &dyn DefinitionMatcher,
        dictionary: &dyn DictionaryLookup,
    ) -> Turn {
        let text = text.trim();
        let question = match self.pending.take() {
            Some(q) if !self.is_exit(text) => q,
            _ => {
                self.stop();
                return Turn::Exit;
            }
        };
        self.tally.asked += 1;

        let verdict = self.grade(text, &question.word, matcher).await;
        let before = self.set.progress(&question.word);
        let after = match verdict {
            Verdict::Correct => advance(before, true, self.config.promotion_threshold),
            Verdict::Incorrect => advance(before, false, self.config.promotion_threshold),
            Verdict::Ungraded { .. } => before,
        };
        self.set.set_progress(&question.word, after);

        match &verdict {
            Verdict::Correct => self.tally.correct += 1,
            Verdict::Incorrect => self.tally.incorrect += 1,
            Verdict::Ungraded { .. } => self.tally.ungraded += 1,
        }
        match Movement::between(before, after) {
            Movement::Promoted => self.tally.promotions += 1,
            Movement::Demoted => self.tally.demotions += 1,
            Movement::Unchanged => {}
        }
        tracing::debug!(
            word = %question.word,
            ?verdict,
            from = %before.category,
            to = %after.category,
            streak = after.streak,
            "graded answer"
        );

        let definition = if let Verdict::Ungraded { .. } = verdict {
            // Ask the same word again rather than revealing it.
            self.pending = Some(question.clone());
            self.state = SessionState::AwaitingInput;
            None
        } else {
            self.state = SessionState::Running;
            Some(self.definition_of(&question.word, dictionary).await)
        };

        Turn::Graded(Feedback {
            word: question.word,
            verdict,
            before,
            after,
            definition,
        })
    }

    fn is_exit(&self, text: &str) -> bool {
        text.to_lowercase() == self.config.exit_token.trim().to_lowercase()
    }

    async fn grade(&self, text: &str, word: &str, matcher: &dyn DefinitionMatcher) -> Verdict {
        // Nothing cannot describe a word.
        if text.is_empty() {
            return Verdict::Incorrect;
        }
        match tokio::time::timeout(self.config.service_timeout, matcher.candidates(text)).await {
            Ok(Ok(candidates)) => {
                if is_candidate(word, &candidates) {
                    Verdict::Correct
                } else {
                    Verdict::Incorrect
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(matcher = matcher.name(), error = %e, "definition matching failed");
                Verdict::Ungraded {
                    reason: VocabError::ServiceUnavailable(format!("{e:#}")).to_string(),
                }
            }
            Err(_) => {
                tracing::warn!(matcher = matcher.name(), "definition matching timed out");
                Verdict::Ungraded {
                    reason: VocabError::ServiceUnavailable(format!(
                        "{} did not answer within {}s, please try again",
                        matcher.name(),
                        self.config.service_timeout.as_secs()
                    ))
                    .to_string(),
                }
            }
        }
    }

    async fn definition_of(&self, word: &str, dictionary: &dyn DictionaryLookup) -> String {
        let sense = match tokio::time::timeout(self.config.service_timeout, dictionary.senses(word)).await {
            Ok(Ok(senses)) => senses.into_iter().next(),
            Ok(Err(e)) => {
                tracing::warn!(dictionary = dictionary.name(), error = %e, "definition lookup failed");
                None
            }
            Err(_) => {
                tracing::warn!(dictionary = dictionary.name(), "definition lookup timed out");
                None
            }
        };
        sense.unwrap_or_else(|| DEFINITION_UNAVAILABLE.to_string())
    }

    /// End the session without grading anything further.
    pub fn stop(&mut self) {
        self.pending = None;
        self.state = SessionState::Done;
    }

    /// Persist all progress and the registry, consuming the session.
    pub fn finish(mut self, store: &mut ProgressStore) -> Result<SessionSummary, VocabError> {
        self.stop();
        store.save_set(&self.set)?;
        let summary = SessionSummary {
            set_name: self.set.name().to_string(),
            started_at: self.started_at,
            duration: self.started.elapsed(),
            asked: self.tally.asked,
            correct: self.tally.correct,
            incorrect: self.tally.incorrect,
            ungraded: self.tally.ungraded,
            promotions: self.tally.promotions,
            demotions: self.tally.demotions,
            progress: ProgressSummary::of(&self.set),
        };
        tracing::info!(
            set = %summary.set_name,
            asked = summary.asked,
            correct = summary.correct,
            "quiz session finished"
        );
        Ok(summary)
    }
}

/// Collaborators a session talks to.
pub struct Services<'a> {
    pub matcher: &'a dyn DefinitionMatcher,
    pub dictionary: &'a dyn DictionaryLookup,
}

/// Run a full quiz over the set `name` until the learner exits.
///
/// Progress is saved whenever the loop ends, including when reading input
/// fails part way through.
pub async fn run_session<R: Rng>(
    store: &mut ProgressStore,
    name: &str,
    config: SessionConfig,
    rng: R,
    services: Services<'_>,
    input: &mut dyn AnswerSource,
    reporter: &dyn SessionReporter,
) -> Result<SessionSummary> {
    let set = store.load_set(name)?;
    let mut session = QuizSession::start(set, config, rng)?;

    let outcome = drive(&mut session, &services, input, reporter).await;
    let saved = session.finish(store);

    if let Err(e) = outcome {
        if let Err(save_err) = &saved {
            tracing::error!(error = %save_err, "failed to save progress after session error");
        }
        return Err(e);
    }
    let summary = saved?;
    reporter.on_finish(&summary);
    Ok(summary)
}

async fn drive<R: Rng>(
    session: &mut QuizSession<R>,
    services: &Services<'_>,
    input: &mut dyn AnswerSource,
    reporter: &dyn SessionReporter,
) -> Result<()> {
    while let Some(question) = session.next_question()? {
        reporter.on_question(&question);
        let Some(text) = input.read_answer(&question)? else {
            session.stop();
            break;
        };
        match session
            .answer(&text, services.matcher, services.dictionary)
            .await
        {
            Turn::Graded(feedback) => reporter.on_feedback(&feedback),
            Turn::Exit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::store::MemoryStore;

    /// Answers "correct" when the definition maps to the word in `table`.
    struct TableMatcher {
        table: HashMap<String, Vec<String>>,
    }

    impl TableMatcher {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(def, words)| {
                        (def.to_string(), words.iter().map(|w| w.to_string()).collect())
                    })
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl DefinitionMatcher for TableMatcher {
        fn name(&self) -> &str {
            "table"
        }

        async fn candidates(&self, definition: &str) -> anyhow::Result<Vec<String>> {
            Ok(self.table.get(definition).cloned().unwrap_or_default())
        }
    }

    struct FailingMatcher;

    #[async_trait]
    impl DefinitionMatcher for FailingMatcher {
        fn name(&self) -> &str {
            "failing"
        }

        async fn candidates(&self, _: &str) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("connection refused")
        }
    }

    struct SlowMatcher;

    #[async_trait]
    impl DefinitionMatcher for SlowMatcher {
        fn name(&self) -> &str {
            "slow"
        }

        async fn candidates(&self, _: &str) -> anyhow::Result<Vec<String>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![])
        }
    }

    struct FixedDictionary(Vec<String>);

    #[async_trait]
    impl DictionaryLookup for FixedDictionary {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn senses(&self, _: &str) -> anyhow::Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    struct Scripted(VecDeque<String>);

    impl Scripted {
        fn new(answers: &[&str]) -> Self {
            Self(answers.iter().map(|a| a.to_string()).collect())
        }
    }

    impl AnswerSource for Scripted {
        fn read_answer(&mut self, _: &Question) -> std::io::Result<Option<String>> {
            Ok(self.0.pop_front())
        }
    }

    struct BrokenInput;

    impl AnswerSource for BrokenInput {
        fn read_answer(&mut self, _: &Question) -> std::io::Result<Option<String>> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed"))
        }
    }

    #[derive(Default)]
    struct Recorder {
        questions: RefCell<Vec<Question>>,
        feedback: RefCell<Vec<Feedback>>,
    }

    impl SessionReporter for Recorder {
        fn on_question(&self, question: &Question) {
            self.questions.borrow_mut().push(question.clone());
        }
        fn on_feedback(&self, feedback: &Feedback) {
            self.feedback.borrow_mut().push(feedback.clone());
        }
        fn on_finish(&self, _: &SessionSummary) {}
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn single_word_set(progress: WordProgress) -> VocabularySet {
        let mut set = VocabularySet::from_words("gre", "gre.json", ["abate"]);
        set.set_progress("abate", progress);
        set
    }

    fn dictionary() -> FixedDictionary {
        FixedDictionary(vec!["become less in amount or intensity".into()])
    }

    #[test]
    fn empty_set_fails_before_any_question() {
        let set = VocabularySet::from_words("gre", "gre.json", Vec::<String>::new());
        let err = QuizSession::start(set, SessionConfig::default(), rng()).err().unwrap();
        assert!(matches!(err, VocabError::NoWordsAvailable));
    }

    #[tokio::test]
    async fn state_machine_transitions() {
        let mut session =
            QuizSession::start(single_word_set(WordProgress::default()), SessionConfig::default(), rng())
                .unwrap();
        assert_eq!(session.state(), SessionState::Running);

        let q = session.next_question().unwrap().unwrap();
        assert_eq!(q.word, "abate");
        assert_eq!(q.category, Category::New);
        assert_eq!(session.state(), SessionState::AwaitingInput);
        // Asking again returns the same pending question.
        assert_eq!(session.next_question().unwrap(), Some(q));

        let matcher = TableMatcher::new(&[("lessen", &["abate"])]);
        let turn = session.answer("lessen", &matcher, &dictionary()).await;
        assert!(matches!(turn, Turn::Graded(_)));
        assert_eq!(session.state(), SessionState::Running);

        session.next_question().unwrap();
        let turn = session.answer(" e ", &matcher, &dictionary()).await;
        assert_eq!(turn, Turn::Exit);
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.next_question().unwrap(), None);
    }

    #[tokio::test]
    async fn correct_new_word_is_mastered() {
        let mut session =
            QuizSession::start(single_word_set(WordProgress::default()), SessionConfig::default(), rng())
                .unwrap();
        session.next_question().unwrap();
        let matcher = TableMatcher::new(&[("to lessen", &["diminish", "abate"])]);
        let Turn::Graded(feedback) = session.answer("to lessen", &matcher, &dictionary()).await else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.verdict, Verdict::Correct);
        assert_eq!(feedback.after, WordProgress::new(Category::Mastered, 0));
        assert_eq!(feedback.movement(), Movement::Promoted);
        assert_eq!(feedback.definition.as_deref(), Some("become less in amount or intensity"));
    }

    #[tokio::test]
    async fn blank_answer_is_incorrect() {
        let mut session =
            QuizSession::start(single_word_set(WordProgress::default()), SessionConfig::default(), rng())
                .unwrap();
        session.next_question().unwrap();
        let Turn::Graded(feedback) = session.answer("   ", &FailingMatcher, &dictionary()).await else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.verdict, Verdict::Incorrect);
        assert_eq!(feedback.after, WordProgress::new(Category::Learning, 0));
    }

    #[tokio::test]
    async fn matcher_failure_leaves_progress_unchanged() {
        let start = WordProgress::new(Category::Reviewing, 2);
        let mut session =
            QuizSession::start(single_word_set(start), SessionConfig::default(), rng()).unwrap();
        session.next_question().unwrap();
        let Turn::Graded(feedback) = session.answer("to lessen", &FailingMatcher, &dictionary()).await
        else {
            panic!("expected feedback");
        };
        assert!(matches!(feedback.verdict, Verdict::Ungraded { ref reason } if reason.contains("connection refused")));
        assert_eq!(feedback.after, start);
        assert_eq!(feedback.definition, None);
        assert_eq!(session.set().progress("abate"), start);

        // The same word is put to the learner again.
        assert_eq!(session.state(), SessionState::AwaitingInput);
        let again = session.next_question().unwrap().unwrap();
        assert_eq!(again.word, "abate");
        let matcher = TableMatcher::new(&[("to lessen", &["abate"])]);
        let Turn::Graded(feedback) = session.answer("to lessen", &matcher, &dictionary()).await else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.verdict, Verdict::Correct);
        assert!(feedback.definition.is_some());
        assert_eq!(session.state(), SessionState::Running);
    }

    #[tokio::test]
    async fn exit_token_ignores_case() {
        let config = SessionConfig {
            exit_token: "Quit".to_string(),
            ..SessionConfig::default()
        };
        let mut session =
            QuizSession::start(single_word_set(WordProgress::default()), config, rng()).unwrap();
        session.next_question().unwrap();
        let turn = session.answer("Quit", &FailingMatcher, &dictionary()).await;
        assert_eq!(turn, Turn::Exit);
        assert_eq!(session.set().progress("abate"), WordProgress::default());

        let config = SessionConfig {
            exit_token: "Quit".to_string(),
            ..SessionConfig::default()
        };
        let mut session =
            QuizSession::start(single_word_set(WordProgress::default()), config, rng()).unwrap();
        session.next_question().unwrap();
        assert_eq!(session.answer(" QUIT ", &FailingMatcher, &dictionary()).await, Turn::Exit);
    }

    #[tokio::test(start_paused = true)]
    async fn matcher_timeout_is_ungraded() {
        let start = WordProgress::new(Category::Learning, 1);
        let config = SessionConfig {
            service_timeout: Duration::from_secs(2),
            ..SessionConfig::default()
        };
        let mut session = QuizSession::start(single_word_set(start), config, rng()).unwrap();
        session.next_question().unwrap();
        let Turn::Graded(feedback) = session.answer("to lessen", &SlowMatcher, &dictionary()).await else {
            panic!("expected feedback");
        };
        assert!(matches!(feedback.verdict, Verdict::Ungraded { ref reason } if reason.contains("try again")));
        assert_eq!(session.set().progress("abate"), start);
    }

    #[tokio::test]
    async fn missing_definition_uses_placeholder() {
        let mut session =
            QuizSession::start(single_word_set(WordProgress::default()), SessionConfig::default(), rng())
                .unwrap();
        session.next_question().unwrap();
        let matcher = TableMatcher::new(&[]);
        let Turn::Graded(feedback) = session.answer("noise", &matcher, &FixedDictionary(vec![])).await
        else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.definition.as_deref(), Some(DEFINITION_UNAVAILABLE));
    }

    #[tokio::test]
    async fn run_session_persists_on_exit() {
        let backend = MemoryStore::new();
        let mut store = ProgressStore::open(Box::new(backend.clone())).unwrap();
        store.create_set_from_words("gre", ["abate"]).unwrap();

        let matcher = TableMatcher::new(&[("lessen", &["abate"])]);
        let dict = dictionary();
        let mut input = Scripted::new(&["wrong", "lessen", "lessen", "lessen", "e"]);
        let recorder = Recorder::default();

        let summary = run_session(
            &mut store,
            "gre",
            SessionConfig::default(),
            rng(),
            Services {
                matcher: &matcher,
                dictionary: &dict,
            },
            &mut input,
            &recorder,
        )
        .await
        .unwrap();

        assert_eq!(summary.asked, 4);
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.incorrect, 1);
        // new -> learning, then learning -> reviewing
        assert_eq!(summary.promotions, 2);
        assert_eq!(summary.progress.count(Category::Reviewing), 1);

        let streaks: Vec<u32> = recorder.feedback.borrow().iter().map(|f| f.after.streak).collect();
        assert_eq!(streaks, vec![0, 1, 2, 0]);
        assert_eq!(recorder.questions.borrow().len(), 5);

        let reloaded = store.load_set("gre").unwrap();
        assert_eq!(reloaded.progress("abate"), WordProgress::new(Category::Reviewing, 0));
    }

    #[tokio::test]
    async fn end_of_input_still_saves() {
        let backend = MemoryStore::new();
        let mut store = ProgressStore::open(Box::new(backend.clone())).unwrap();
        store.create_set_from_words("gre", ["abate"]).unwrap();

        let matcher = TableMatcher::new(&[]);
        let dict = dictionary();
        let mut input = Scripted::new(&["nonsense"]);

        let summary = run_session(
            &mut store,
            "gre",
            SessionConfig::default(),
            rng(),
            Services {
                matcher: &matcher,
                dictionary: &dict,
            },
            &mut input,
            &NoopReporter,
        )
        .await
        .unwrap();

        assert_eq!(summary.incorrect, 1);
        assert_eq!(
            store.load_set("gre").unwrap().progress("abate"),
            WordProgress::new(Category::Learning, 0)
        );
    }

    #[tokio::test]
    async fn input_error_saves_then_propagates() {
        let mut store = ProgressStore::open(Box::new(MemoryStore::new())).unwrap();
        store.create_set_from_words("gre", ["abate"]).unwrap();
        let matcher = TableMatcher::new(&[]);
        let dict = dictionary();

        let err = run_session(
            &mut store,
            "gre",
            SessionConfig::default(),
            rng(),
            Services {
                matcher: &matcher,
                dictionary: &dict,
            },
            &mut BrokenInput,
            &NoopReporter,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("stdin closed"));
        assert!(store.load_set("gre").is_ok());
    }

    #[tokio::test]
    async fn unknown_set_aborts() {
        let mut store = ProgressStore::open(Box::new(MemoryStore::new())).unwrap();
        let matcher = TableMatcher::new(&[]);
        let dict = dictionary();
        let err = run_session(
            &mut store,
            "missing",
            SessionConfig::default(),
            rng(),
            Services {
                matcher: &matcher,
                dictionary: &dict,
            },
            &mut Scripted::new(&[]),
            &NoopReporter,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VocabError>(),
            Some(VocabError::UnknownSet(_))
        ));
    }
}
