//! One editing session of the studio settings screen.
//!
//! A session owns the form, the save banners and the in-flight flag. Only
//! one update may be outstanding at a time; the form stays editable while
//! it is.

use std::sync::Arc;

use domain::models::{FieldValue, SettingField, SettingsId, SettingsPayload, SettingsRecord};
use domain::services::{InputError, NotificationCenter, NotificationKind, SettingsForm, SyncError};
use thiserror::Error;

use crate::context::StudioContext;

/// Why a submission did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("A settings update is already in progress")]
    InFlight,

    #[error("{count} visible field(s) are invalid")]
    Invalid { count: usize },

    #[error(transparent)]
    Failed(#[from] SyncError),
}

/// Proof that a submission has begun. Carries the payload to send.
#[derive(Debug)]
#[must_use = "pass the ticket to finish_submit to clear the in-flight flag"]
pub struct SubmitTicket {
    payload: SettingsPayload,
}

impl SubmitTicket {
    pub fn payload(&self) -> &SettingsPayload {
        &self.payload
    }
}

#[derive(Debug)]
pub struct SettingsSession {
    context: Arc<StudioContext>,
    id: SettingsId,
    form: SettingsForm,
    notifications: NotificationCenter,
    in_flight: bool,
}

impl SettingsSession {
    pub(crate) fn new(context: Arc<StudioContext>, record: SettingsRecord) -> Self {
        let notifications = NotificationCenter::new(context.options().auto_hide);
        Self {
            context,
            id: record.id,
            form: SettingsForm::new(&record.settings),
            notifications,
            in_flight: false,
        }
    }

    pub fn id(&self) -> SettingsId {
        self.id
    }

    pub fn form(&self) -> &SettingsForm {
        &self.form
    }

    pub fn set_field(&mut self, field: SettingField, value: FieldValue) {
        self.form.set_field(field, value);
    }

    pub fn set_field_input(&mut self, name: &str, raw: &str) -> Result<SettingField, InputError> {
        self.form.set_field_input(name, raw)
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    /// Whether an update is outstanding. The submit action is disabled
    /// while it is.
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Validates, casts and marks the session in flight.
    ///
    /// Invalid active fields refuse the submission and are all marked
    /// touched so their errors show. Hidden fields never block.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitError> {
        if self.in_flight {
            tracing::debug!(settings_id = %self.id, "Submit ignored, update in flight");
            return Err(SubmitError::InFlight);
        }

        if self.form.has_blocking_errors() {
            self.form.touch_all_active();
            let count = self.form.errors().count();
            tracing::debug!(settings_id = %self.id, count, "Submit refused, invalid fields");
            return Err(SubmitError::Invalid { count });
        }

        self.in_flight = true;
        Ok(SubmitTicket {
            payload: self.form.cast(self.id),
        })
    }

    /// Settles a submission started by [`Self::begin_submit`].
    ///
    /// On success the stored record becomes the new baseline and the success
    /// banner opens. Edits made while the update was in flight are kept. On
    /// failure the values are left as they are and the error banner opens.
    pub async fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<SettingsRecord, SyncError>,
    ) -> Result<SettingsRecord, SubmitError> {
        self.in_flight = false;

        match result {
            Ok(record) => {
                tracing::info!(
                    settings_id = %record.id,
                    fields = ticket.payload.values.len(),
                    "Settings saved"
                );
                self.id = record.id;
                self.form.commit_saved(&record.settings, &ticket.payload);
                self.context.apply_update(record.clone()).await;
                self.notifications.show(NotificationKind::Success);
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(settings_id = %ticket.payload.id, error = %e, "Settings update failed");
                self.notifications.show(NotificationKind::Error);
                Err(SubmitError::Failed(e))
            }
        }
    }

    /// Sends the form to the settings store and settles the outcome.
    pub async fn submit(&mut self) -> Result<SettingsRecord, SubmitError> {
        let ticket = self.begin_submit()?;
        let result = self
            .context
            .api()
            .update_settings(ticket.payload().clone())
            .await;
        self.finish_submit(ticket, result).await
    }

    /// Applies banner timeouts. Returns the banners that closed.
    pub fn tick_notifications(&mut self) -> Vec<NotificationKind> {
        self.notifications.tick()
    }
}
