//! Failure classification: which outcomes are shown to the user.

use nextbox_contract::{HostError, RawResponse};

/// Statuses the platform returns for missing or forbidden elements; callers treat them as
/// ordinary outcomes.
const EXPECTED_STATUSES: [u16; 2] = [403, 404];

/// Returns `true` when `response` is a failure that should reach the user.
pub fn should_surface(response: &RawResponse) -> bool {
    !response.ok && !EXPECTED_STATUSES.contains(&response.status)
}

/// Returns `true` for a failed response with an expected status.
pub fn is_expected_status(response: &RawResponse) -> bool {
    !response.ok && EXPECTED_STATUSES.contains(&response.status)
}

/// Applies [`should_surface`] to a host failure; failures without a response always surface.
pub fn should_surface_error(error: &HostError) -> bool {
    error.response().map_or(true, should_surface)
}

/// Detail line for a host failure: the failure text, or the response reason phrase.
pub fn error_message(error: &HostError) -> String {
    match error {
        HostError::Response(response) => response.status_text.clone(),
        HostError::Failure(message) => message.clone(),
    }
}
