//! Reactive field controller.
//!
//! Watches the plaintext, password and envelope fields and recomputes the
//! dependent fields after a debounce delay:
//!
//! - plaintext/password edit: hash + envelope from (plaintext, password),
//!   then decrypted from (new envelope, password)
//! - envelope edit: decrypted from (envelope, password) only
//!
//! Each controller owns its own debounce timer. An edit aborts the pending
//! timer; work that already started is never aborted. Instead every edit
//! advances a generation counter, and results carrying an older generation
//! are dropped, so a slow stale derivation can never overwrite a newer one.
//!
//! Two generation counters exist, one per field group. The hash group
//! advances on plaintext/password edits; the cipher group (envelope and
//! decrypted) advances on every edit. An envelope edit therefore keeps an
//! in-flight hash but discards the in-flight envelope it would clobber.

pub mod fields;

pub use fields::{Field, Fields, UnknownField};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use zeroize::Zeroizing;

use crate::crypto::{CryptoProvider, PlatformCrypto};
use crate::envelope::EnvelopeCodec;

/// Default quiet period before recomputing (150 ms).
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(150);

/// Controller state as seen by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    /// Nothing scheduled or running.
    Idle,
    /// A recomputation is scheduled and waiting out the debounce delay.
    Pending,
    /// Key derivation / encryption / decryption in flight.
    Computing,
}

impl ControllerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ControllerStatus::Idle => "Idle",
            ControllerStatus::Pending => "Pending...",
            ControllerStatus::Computing => "Computing...",
        }
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self, ControllerStatus::Idle)
    }
}

/// Notifications sent to the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Status(ControllerStatus),
    /// A computed field received a new value.
    Updated { field: Field, value: String },
    /// The crypto provider failed while encoding.
    Failed(String),
    /// All fields were blanked.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("The {0} field is computed and cannot be edited")]
pub struct ReadOnlyField(pub Field);

/// Monotonically increasing generation counter.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    /// Start a new generation and return its value.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current() == ticket
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Hash,
    Cipher,
}

/// Generations captured when a job was scheduled.
#[derive(Debug, Clone, Copy)]
struct Ticket {
    hash: u64,
    cipher: u64,
}

#[derive(Debug, Clone, Copy)]
enum Job {
    /// Hash + envelope + decrypted.
    All,
    /// Decrypted only.
    Decrypted,
}

struct Shared {
    fields: RwLock<Fields>,
    status: RwLock<ControllerStatus>,
    hash_generation: Generation,
    cipher_generation: Generation,
    events: mpsc::UnboundedSender<FieldEvent>,
}

impl Shared {
    fn emit(&self, event: FieldEvent) {
        // Receiver gone means nobody is watching; that's fine.
        let _ = self.events.send(event);
    }

    fn is_current(&self, ticket: Ticket, group: Group) -> bool {
        match group {
            Group::Hash => self.hash_generation.is_current(ticket.hash),
            Group::Cipher => self.cipher_generation.is_current(ticket.cipher),
        }
    }

    async fn set_status(&self, status: ControllerStatus) {
        let mut current = self.status.write().await;
        if *current != status {
            *current = status;
            self.emit(FieldEvent::Status(status));
        }
    }

    /// Snapshot the inputs for a job if it is still wanted.
    ///
    /// Only the latest job (current cipher generation) drives the status.
    async fn begin(&self, ticket: Ticket, primary: Group) -> Option<Inputs> {
        let fields = self.fields.read().await;
        if !self.is_current(ticket, primary) {
            return None;
        }
        if self.is_current(ticket, Group::Cipher) {
            self.set_status(ControllerStatus::Computing).await;
        }
        Some(Inputs {
            plaintext: Zeroizing::new(fields.plaintext.clone()),
            password: Zeroizing::new(fields.password.clone()),
            envelope: fields.envelope.clone(),
        })
    }

    /// Write a computed value unless a newer edit made it stale.
    async fn apply(&self, ticket: Ticket, group: Group, field: Field, value: String) -> bool {
        let mut fields = self.fields.write().await;
        if !self.is_current(ticket, group) {
            log::debug!("Discarding stale {} result", field);
            return false;
        }
        fields.set(field, value.clone());
        self.emit(FieldEvent::Updated { field, value });
        true
    }

    async fn fail(&self, ticket: Ticket, message: String) {
        let _fields = self.fields.read().await;
        if self.is_current(ticket, Group::Hash) {
            self.emit(FieldEvent::Failed(message));
        }
    }

    async fn finish(&self, ticket: Ticket) {
        let _fields = self.fields.read().await;
        if self.is_current(ticket, Group::Cipher) {
            self.set_status(ControllerStatus::Idle).await;
        }
    }
}

struct Inputs {
    plaintext: Zeroizing<String>,
    password: Zeroizing<String>,
    envelope: String,
}

/// Debounced recomputation of hash, envelope and round-trip plaintext.
pub struct FieldController<P: CryptoProvider = PlatformCrypto> {
    codec: Arc<EnvelopeCodec<P>>,
    shared: Arc<Shared>,
    timer: Option<JoinHandle<()>>,
    delay: Duration,
}

impl<P: CryptoProvider> FieldController<P> {
    /// Create a controller with blank fields in the `Idle` state.
    ///
    /// Returns the receiving end of the controller's event channel.
    pub fn new(codec: EnvelopeCodec<P>, delay: Duration) -> (Self, mpsc::UnboundedReceiver<FieldEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            codec: Arc::new(codec),
            shared: Arc::new(Shared {
                fields: RwLock::new(Fields::default()),
                status: RwLock::new(ControllerStatus::Idle),
                hash_generation: Generation::default(),
                cipher_generation: Generation::default(),
                events,
            }),
            timer: None,
            delay,
        };
        (controller, rx)
    }

    pub fn codec(&self) -> &EnvelopeCodec<P> {
        &self.codec
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The user edited the plaintext field.
    pub async fn set_plaintext(&mut self, text: impl Into<String>) {
        self.edit(Field::Plaintext, text.into(), Job::All).await;
    }

    /// The user edited the password field.
    pub async fn set_password(&mut self, password: impl Into<String>) {
        self.edit(Field::Password, password.into(), Job::All).await;
    }

    /// The user edited the envelope field directly.
    pub async fn set_envelope(&mut self, envelope: impl Into<String>) {
        self.edit(Field::Envelope, envelope.into(), Job::Decrypted).await;
    }

    /// Edit any input field by name. Computed fields are read-only.
    pub async fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), ReadOnlyField> {
        match field {
            Field::Plaintext => self.set_plaintext(value).await,
            Field::Password => self.set_password(value).await,
            Field::Envelope => self.set_envelope(value).await,
            Field::Decrypted | Field::Hash => return Err(ReadOnlyField(field)),
        }
        Ok(())
    }

    /// Cancel pending work, invalidate in-flight work and blank every field.
    pub async fn reset(&mut self) {
        self.cancel_timer();
        let mut fields = self.shared.fields.write().await;
        self.shared.hash_generation.advance();
        self.shared.cipher_generation.advance();
        fields.clear();
        self.shared.set_status(ControllerStatus::Idle).await;
        self.shared.emit(FieldEvent::Reset);
        log::debug!("Fields reset");
    }

    /// Copy of the current field values.
    pub async fn snapshot(&self) -> Fields {
        self.shared.fields.read().await.clone()
    }

    pub async fn get(&self, field: Field) -> String {
        self.shared.fields.read().await.get(field).to_string()
    }

    pub async fn status(&self) -> ControllerStatus {
        *self.shared.status.read().await
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    async fn edit(&mut self, field: Field, value: String, job: Job) {
        self.cancel_timer();

        let ticket = {
            let mut fields = self.shared.fields.write().await;
            fields.set(field, value);
            let hash = match job {
                Job::All => self.shared.hash_generation.advance(),
                Job::Decrypted => self.shared.hash_generation.current(),
            };
            let cipher = self.shared.cipher_generation.advance();
            self.shared.set_status(ControllerStatus::Pending).await;
            Ticket { hash, cipher }
        };

        log::debug!(
            "{} edited, {:?} recompute scheduled in {}ms (generation {})",
            field,
            job,
            self.delay.as_millis(),
            ticket.cipher
        );

        let codec = Arc::clone(&self.codec);
        let shared = Arc::clone(&self.shared);
        let delay = self.delay;

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so that aborting the timer never cancels started work.
            match job {
                Job::All => tokio::spawn(recompute_all(codec, shared, ticket)),
                Job::Decrypted => tokio::spawn(recompute_decrypted(codec, shared, ticket)),
            };
        }));
    }
}

impl<P: CryptoProvider> Drop for FieldController<P> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Run CPU-bound crypto off the async workers.
async fn blocking<T, F>(work: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Crypto task did not complete: {}", e);
            None
        }
    }
}

async fn recompute_all<P: CryptoProvider>(codec: Arc<EnvelopeCodec<P>>, shared: Arc<Shared>, ticket: Ticket) {
    let Some(inputs) = shared.begin(ticket, Group::Hash).await else {
        log::debug!("Skipping superseded recompute (generation {})", ticket.cipher);
        return;
    };
    let Inputs {
        plaintext,
        password,
        ..
    } = inputs;

    let hash_job = blocking({
        let codec = Arc::clone(&codec);
        let plaintext = plaintext.clone();
        move || codec.hash(&plaintext)
    });
    let encode_job = blocking({
        let codec = Arc::clone(&codec);
        let password = password.clone();
        move || codec.encode(&plaintext, &password)
    });
    let (hash, encoded) = tokio::join!(hash_job, encode_job);

    if let Some(hash) = hash {
        shared.apply(ticket, Group::Hash, Field::Hash, hash).await;
    }

    let envelope = match encoded {
        Some(Ok(envelope)) => envelope,
        Some(Err(e)) => {
            log::error!("Envelope encoding failed: {}", e);
            shared.fail(ticket, e.to_string()).await;
            shared.finish(ticket).await;
            return;
        }
        None => {
            shared.finish(ticket).await;
            return;
        }
    };

    if !shared
        .apply(ticket, Group::Cipher, Field::Envelope, envelope.clone())
        .await
    {
        return;
    }

    let decrypted = blocking(move || codec.decode_or_message(&envelope, &password)).await;
    if let Some(decrypted) = decrypted {
        shared
            .apply(ticket, Group::Cipher, Field::Decrypted, decrypted)
            .await;
    }
    shared.finish(ticket).await;
}

async fn recompute_decrypted<P: CryptoProvider>(
    codec: Arc<EnvelopeCodec<P>>,
    shared: Arc<Shared>,
    ticket: Ticket,
) {
    let Some(inputs) = shared.begin(ticket, Group::Cipher).await else {
        log::debug!("Skipping superseded decode (generation {})", ticket.cipher);
        return;
    };
    let Inputs {
        password, envelope, ..
    } = inputs;

    let decrypted = blocking(move || codec.decode_or_message(&envelope, &password)).await;
    if let Some(decrypted) = decrypted {
        shared
            .apply(ticket, Group::Cipher, Field::Decrypted, decrypted)
            .await;
    }
    shared.finish(ticket).await;
}
