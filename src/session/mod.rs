//! Editor sessions: one open form with its errors, upload, and submission state.
//!
//! Network work is split in two so a UI loop can run the request elsewhere:
//! `begin_*` checks and claims the session, the caller performs the request,
//! and `finish_*` applies the outcome. [`FormSession::upload`] and
//! [`FormSession::submit`] run all three steps in sequence.

mod controller;
mod rich_text;
mod submit;
mod upload;

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::api::{ApiError, CmsClient};
use crate::config::Config;
use crate::model::{
    EntityKind, FieldErrors, FieldMap, FieldValue, FormMode, Record, ValidationError, validate,
    validate_field,
};

pub use controller::{Derivation, FormController};
pub use rich_text::{PlainText, RichTextBinding, html_to_lines, lines_to_html};
pub use submit::{SubmitBlocked, SubmitState, Submission};
pub use upload::{UploadBlocked, UploadState};

/// Everything one open editor owns.
#[derive(Debug, Clone)]
pub struct FormSession {
    form: FormController,
    errors: FieldErrors,
    file_input: String,
    upload: UploadState,
    submit: SubmitState,
    image_base_url: String,
}

impl FormSession {
    /// A blank create form.
    pub fn create(kind: EntityKind, config: &Config) -> Self {
        Self {
            form: FormController::create(kind),
            errors: FieldErrors::new(),
            file_input: String::new(),
            upload: UploadState::default(),
            submit: SubmitState::Idle,
            image_base_url: config.image_base_url.clone(),
        }
    }

    /// An update form for a fetched record, previewing its stored image.
    pub fn update(record: &Record, config: &Config) -> Self {
        let form = FormController::update(record);
        let image = form.text(form.kind().image_field());
        let preview = (!image.is_empty()).then(|| config.preview_url(image));
        Self {
            form,
            errors: FieldErrors::new(),
            file_input: String::new(),
            upload: UploadState::with_preview(preview),
            submit: SubmitState::Idle,
            image_base_url: config.image_base_url.clone(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.form.kind()
    }

    pub fn mode(&self) -> &FormMode {
        self.form.mode()
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn values(&self) -> &FieldMap {
        self.form.values()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The inline message for a field or the body, if any.
    pub fn error(&self, name: &str) -> Option<&ValidationError> {
        self.errors.get(name)
    }

    pub fn file_input(&self) -> &str {
        &self.file_input
    }

    pub fn uploading(&self) -> bool {
        self.upload.uploading()
    }

    pub fn preview(&self) -> Option<&str> {
        self.upload.preview()
    }

    pub fn state(&self) -> &SubmitState {
        &self.submit
    }

    /// Writes a field through the controller.
    pub fn set(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        self.form.set(name, value);
    }

    /// Puts the slug back under title control.
    pub fn follow_title(&mut self) {
        self.form.follow_title();
    }

    pub fn set_file_input(&mut self, path: impl Into<String>) {
        self.file_input = path.into();
    }

    /// Re-validates one field as focus leaves it. Other messages are untouched.
    pub fn blur(&mut self, name: &str) {
        let Some(spec) = self.kind().field(name) else {
            return;
        };
        match validate_field(spec, self.form.values()) {
            Err(err) => {
                self.errors.insert(spec.name, err);
            }
            Ok(()) => {
                self.errors.remove(spec.name);
            }
        }
    }

    /// Clears the body message once the body has content again.
    pub fn blur_body(&mut self, body: &dyn RichTextBinding) {
        let (name, _) = self.kind().body_field();
        if body_html(body).is_some() {
            self.errors.remove(name);
        }
    }

    /// Claims the session for an upload of the file named in the path input.
    pub fn begin_upload(&mut self) -> Result<PathBuf, UploadBlocked> {
        let path = self.file_input.trim();
        if path.is_empty() {
            return Err(UploadBlocked::NoFile);
        }
        let path = PathBuf::from(path);
        self.upload.begin()?;
        Ok(path)
    }

    /// Applies an upload outcome. A failure leaves the image field and
    /// preview as they were.
    pub fn finish_upload(&mut self, outcome: Result<String, ApiError>) {
        match outcome {
            Ok(file_id) => {
                let kind = self.kind();
                let preview = format!("{}{}", self.image_base_url, file_id);
                info!(%kind, file = %file_id, "image uploaded");
                self.form.set(kind.image_field(), file_id);
                self.upload.finish(Some(preview));
                if self.errors.contains_key(kind.image_field()) {
                    self.blur(kind.image_field());
                }
            }
            Err(e) => {
                let kind = self.kind();
                error!(%kind, status = ?e.status(), error = %e, "image upload failed");
                self.upload.finish(None);
            }
        }
    }

    /// Uploads the file named in the path input.
    pub async fn upload(&mut self, client: &CmsClient) -> Result<(), UploadBlocked> {
        let path = self.begin_upload()?;
        let outcome = client.upload_image(&path).await;
        self.finish_upload(outcome);
        Ok(())
    }

    /// Validates, checks the body, and builds the request.
    ///
    /// On success the session is `Submitting` until [`finish_submit`] runs.
    ///
    /// [`finish_submit`]: Self::finish_submit
    pub fn begin_submit(
        &mut self,
        body: &dyn RichTextBinding,
    ) -> Result<Submission, SubmitBlocked> {
        let kind = self.kind();
        match self.submit {
            SubmitState::Submitting => {
                warn!(%kind, "submission refused: one already in flight");
                return Err(SubmitBlocked::InFlight);
            }
            SubmitState::Succeeded | SubmitState::Failed(_) => {
                warn!(%kind, "submission refused: previous result not dismissed");
                return Err(SubmitBlocked::Unacknowledged);
            }
            SubmitState::Idle => {}
        }

        self.errors = validate(kind.fields(), self.form.values());
        if !self.errors.is_empty() {
            warn!(%kind, invalid = self.errors.len(), "submission blocked by validation");
            return Err(SubmitBlocked::Invalid(self.errors.len()));
        }

        let (body_name, body_label) = kind.body_field();
        let Some(html) = body_html(body) else {
            warn!(%kind, field = body_name, "submission blocked: rich text unavailable or empty");
            self.errors.insert(body_name, ValidationError::Required(body_label));
            return Err(SubmitBlocked::MissingBody(body_label));
        };

        let payload = kind.payload(self.form.values(), html);
        self.submit = SubmitState::Submitting;
        Ok(Submission {
            kind,
            mode: self.form.mode().clone(),
            payload,
        })
    }

    /// Applies the response to an in-flight submission.
    pub fn finish_submit(&mut self, outcome: Result<(), ApiError>, body: &mut dyn RichTextBinding) {
        let kind = self.kind();
        if self.submit != SubmitState::Submitting {
            warn!(%kind, "submission result ignored: nothing in flight");
            return;
        }
        match outcome {
            Ok(()) => {
                info!(%kind, mode = ?self.form.mode(), "record saved");
                body.clear();
                self.file_input.clear();
                self.upload.clear_preview();
                if *self.form.mode() == FormMode::Create {
                    self.form.reset();
                }
                self.errors.clear();
                self.submit = SubmitState::Succeeded;
            }
            Err(e) => {
                error!(%kind, status = ?e.status(), error = %e, "submission failed");
                self.submit = SubmitState::Failed(e.to_string());
            }
        }
    }

    /// Validates and sends the form, then applies the response.
    pub async fn submit(
        &mut self,
        client: &CmsClient,
        body: &mut dyn RichTextBinding,
    ) -> Result<(), SubmitBlocked> {
        let submission = self.begin_submit(&*body)?;
        let outcome = submission.send(client).await;
        self.finish_submit(outcome, body);
        Ok(())
    }

    /// Acknowledges a success or failure so the form can be submitted again.
    pub fn dismiss(&mut self) {
        if self.submit.is_terminal() {
            self.submit = SubmitState::Idle;
        }
    }
}

/// The body's HTML, or `None` when unavailable or empty.
fn body_html(body: &dyn RichTextBinding) -> Option<String> {
    body.html().filter(|html| !html.trim().is_empty())
}
