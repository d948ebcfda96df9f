//! Submission coordinator: the single state machine behind the attendance view.
//!
//! ```text
//! Idle → AwaitingInput → Validating → Submitting → Success → Idle
//!              ↑              │             │
//!              └──────────────┘             └──→ Failed → AwaitingInput
//!               (DigitMismatch)
//! ```
//!
//! The coordinator owns the challenge, the digit slots, the record set and
//! its cursor. Every failure path leaves all of them consistent before
//! returning.

use std::time::Duration;

use asistencia_common::constants::{CONFIRMATION_MARKER, DEFAULT_REFRESH_DELAY_MS, messages};
use asistencia_common::error::Operation;
use asistencia_common::{
    AttendanceError, AttendanceRecord, Challenge, CoordinatorState, DigitSlot, Notice, PageView,
    Session,
};
use chrono::{DateTime, Local};
use tokio::time::Instant;

use crate::challenge::{ChallengeGenerator, DigitValidator, IndexSource};
use crate::pagination::PageCursor;
use crate::schedule::StatusClassifier;
use crate::service::{AttendanceService, CheckInAck, CheckInRequest, ServiceError};

/// Tunables for the coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Delay between an accepted check-in and the follow-up fetch
    pub refresh_delay: Duration,
    /// Substring of the acknowledgment message that confirms a check-in
    pub confirmation_marker: String,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_millis(DEFAULT_REFRESH_DELAY_MS),
            confirmation_marker: CONFIRMATION_MARKER.to_string(),
        }
    }
}

/// Proof that a submission passed validation and is in flight.
///
/// Only [`SubmissionCoordinator::begin_submission`] creates one, and
/// [`SubmissionCoordinator::finish_submission`] consumes it.
#[derive(Debug)]
pub struct PendingCheckIn {
    request: CheckInRequest,
}

impl PendingCheckIn {
    pub fn request(&self) -> &CheckInRequest {
        &self.request
    }
}

/// Orchestrates challenge, validation, submission and history refresh
pub struct SubmissionCoordinator<S, R> {
    session: Session,
    service: S,
    generator: ChallengeGenerator<R>,
    validator: DigitValidator,
    classifier: StatusClassifier,
    settings: CoordinatorSettings,

    state: CoordinatorState,
    challenge: Challenge,
    digits: [String; 2],
    records: Vec<AttendanceRecord>,
    cursor: PageCursor,
    notice: Option<Notice>,
    pending_refresh: Option<Instant>,
    opened_at: DateTime<Local>,
}

impl<S, R> SubmissionCoordinator<S, R>
where
    S: AttendanceService,
    R: IndexSource,
{
    /// Open the attendance view for a session, issuing the first challenge.
    ///
    /// The record set starts empty; call [`refresh`](Self::refresh) to load it.
    pub fn open(
        session: Session,
        service: S,
        source: R,
        settings: CoordinatorSettings,
    ) -> Result<Self, AttendanceError> {
        let mut generator = ChallengeGenerator::new(source);
        let challenge = generator.generate(&session.identity_number)?;

        tracing::info!(record_id = session.record_id, "Attendance view opened");

        Ok(Self {
            session,
            service,
            generator,
            validator: DigitValidator,
            classifier: StatusClassifier::default(),
            settings,
            state: CoordinatorState::Idle,
            challenge,
            digits: [String::new(), String::new()],
            records: Vec::new(),
            cursor: PageCursor::default(),
            notice: None,
            pending_refresh: None,
            opened_at: Local::now(),
        })
    }

    // === Read side for the presentation layer ===

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Current challenge positions
    pub fn challenge(&self) -> Challenge {
        self.challenge
    }

    pub fn digit(&self, slot: DigitSlot) -> &str {
        &self.digits[slot_index(slot)]
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn opened_at(&self) -> DateTime<Local> {
        self.opened_at
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Whether an accepted check-in still owes a history refresh
    pub fn refresh_pending(&self) -> bool {
        self.pending_refresh.is_some()
    }

    /// Decorate the current page of records
    pub fn page(&self) -> PageView {
        PageView {
            page_index: self.cursor.page_index(),
            page_size: self.cursor.page_size(),
            total_pages: self.cursor.total_pages(),
            total_records: self.records.len(),
            has_multiple_pages: self.cursor.has_multiple_pages(),
            items: self
                .cursor
                .slice(&self.records)
                .iter()
                .map(|record| self.classifier.decorate(record))
                .collect(),
        }
    }

    // === Input events ===

    /// Set a digit slot. Only the first character is kept.
    pub fn set_digit(&mut self, slot: DigitSlot, value: &str) {
        self.digits[slot_index(slot)] = value.trim().chars().take(1).collect();
        if self.state == CoordinatorState::Idle {
            self.enter(CoordinatorState::AwaitingInput);
        }
    }

    pub fn advance_page(&mut self) {
        self.cursor.advance();
    }

    pub fn retreat_page(&mut self) {
        self.cursor.retreat();
    }

    pub fn seek_page(&mut self, page_index: usize) {
        self.cursor.seek(page_index);
    }

    // === Submission ===

    /// Validate the digit slots and, on success, enter `Submitting`.
    ///
    /// A mismatch regenerates the challenge, clears both slots and rewinds
    /// the cursor; the record set is never touched.
    pub fn begin_submission(&mut self) -> Result<PendingCheckIn, AttendanceError> {
        if self.state == CoordinatorState::Submitting {
            tracing::warn!("Check-in already in flight, rejecting submit");
            return Err(AttendanceError::SubmissionInFlight);
        }

        if self.digits.iter().any(String::is_empty) {
            self.enter(CoordinatorState::AwaitingInput);
            return Err(self.raise(AttendanceError::MissingInput));
        }

        self.enter(CoordinatorState::Validating);

        let [first, second] = &self.digits;
        let valid = self
            .validator
            .validate(&self.challenge, &self.session.identity_number, first, second);

        if !valid {
            let challenge = self.generator.generate(&self.session.identity_number)?;
            self.challenge = challenge;
            self.clear_digits();
            self.cursor.reset();
            self.enter(CoordinatorState::AwaitingInput);

            tracing::warn!(record_id = self.session.record_id, "Digit mismatch, challenge regenerated");
            return Err(self.raise(AttendanceError::DigitMismatch));
        }

        self.enter(CoordinatorState::Submitting);

        Ok(PendingCheckIn {
            request: CheckInRequest::for_record(self.session.record_id),
        })
    }

    /// Resolve an in-flight submission with the service's answer.
    ///
    /// Acceptance regenerates the challenge, clears the slots and schedules a
    /// history refresh. Rejection and transport failures leave the record set
    /// and the challenge as they were.
    pub fn finish_submission(
        &mut self,
        pending: PendingCheckIn,
        result: Result<CheckInAck, ServiceError>,
    ) -> Result<(), AttendanceError> {
        let outcome = match result {
            Ok(ack) if ack.is_confirmed(&self.settings.confirmation_marker) => Ok(()),
            Ok(ack) => Err(AttendanceError::SubmissionRejected(
                ack.message.unwrap_or_default(),
            )),
            Err(e) => Err(e.into_attendance_error(Operation::Submit)),
        };

        match outcome {
            Ok(()) => {
                self.enter(CoordinatorState::Success);

                let challenge = self.generator.generate(&self.session.identity_number)?;
                self.challenge = challenge;
                self.clear_digits();
                self.pending_refresh = Some(Instant::now() + self.settings.refresh_delay);
                self.notice = Some(Notice::success(messages::CHECK_IN_ACCEPTED));

                tracing::info!(
                    record_id = pending.request.record_user,
                    refresh_in_ms = self.settings.refresh_delay.as_millis() as u64,
                    "Check-in accepted"
                );

                self.enter(CoordinatorState::Idle);
                Ok(())
            }
            Err(err) => {
                self.enter(CoordinatorState::Failed);

                tracing::warn!(
                    record_id = pending.request.record_user,
                    error = %err,
                    "Check-in not registered"
                );

                self.enter(CoordinatorState::AwaitingInput);
                Err(self.raise(err))
            }
        }
    }

    /// Validate, submit, and resolve in one step.
    ///
    /// Dropping the future while the request is in flight (a timeout, a
    /// `select!` branch losing) returns the coordinator to `AwaitingInput`
    /// with the digits and challenge untouched.
    pub async fn submit(&mut self) -> Result<(), AttendanceError> {
        let pending = self.begin_submission()?;

        let in_flight = InFlight::arm(&mut self.state);
        let result = self.service.submit_check_in(pending.request()).await;
        in_flight.disarm();

        self.finish_submission(pending, result)
    }

    // === History ===

    /// Fetch the history and replace the record set wholesale.
    ///
    /// On failure the previous set and cursor stay as they were.
    pub async fn refresh(&mut self) -> Result<usize, AttendanceError> {
        match self.service.fetch_records(self.session.record_id).await {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.cursor.replace(count);

                tracing::info!(record_id = self.session.record_id, count, "Attendance history loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(record_id = self.session.record_id, error = %e, "Failed to load attendance history");
                Err(self.raise(e.into_attendance_error(Operation::Fetch)))
            }
        }
    }

    /// Run the refresh scheduled by an accepted check-in, once it is due.
    ///
    /// Returns `Ok(None)` when nothing was scheduled.
    pub async fn settle(&mut self) -> Result<Option<usize>, AttendanceError> {
        let Some(due) = self.pending_refresh.take() else {
            return Ok(None);
        };

        tokio::time::sleep_until(due).await;
        self.refresh().await.map(Some)
    }

    // === Internals ===

    fn enter(&mut self, next: CoordinatorState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "Coordinator transition");
            self.state = next;
        }
    }

    fn clear_digits(&mut self) {
        self.digits.iter_mut().for_each(String::clear);
    }

    /// Record the notice for an error and hand it back
    fn raise(&mut self, err: AttendanceError) -> AttendanceError {
        self.notice = Some(Notice::from(&err));
        err
    }
}

/// Rolls `Submitting` back to `AwaitingInput` unless disarmed
struct InFlight<'a> {
    state: &'a mut CoordinatorState,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn arm(state: &'a mut CoordinatorState) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed && *self.state == CoordinatorState::Submitting {
            tracing::warn!("Check-in abandoned before the service answered");
            *self.state = CoordinatorState::AwaitingInput;
        }
    }
}

fn slot_index(slot: DigitSlot) -> usize {
    match slot {
        DigitSlot::First => 0,
        DigitSlot::Second => 1,
    }
}
