use rand::Rng;

use crate::types::DeviceSessionId;

/// Number of random bytes, and therefore characters, in a device session id.
pub const DEVICE_SESSION_ID_LEN: usize = 32;

/// Default URI scheme embedded in the pairing code.
pub const DEFAULT_PAIRING_SCHEME: &str = "hearai-device-session";

/// Generates a random device session id for one pairing attempt.
///
/// Each of 32 random bytes is reduced mod 36 and mapped to `0-9a-z`. The
/// reduction slightly favours the first few digits; the id only has to be
/// unique per session, not uniformly distributed.
#[must_use]
pub fn generate_device_session_id() -> DeviceSessionId {
    let random_bytes: [u8; DEVICE_SESSION_ID_LEN] = rand::rng().random();
    random_bytes
        .iter()
        .filter_map(|b| char::from_digit(u32::from(b % 36), 36))
        .collect::<String>()
        .into()
}

/// Text rendered into the scannable pairing code: `<scheme>://<id>`.
#[must_use]
pub fn pairing_uri(scheme: &str, id: &DeviceSessionId) -> String {
    format!("{scheme}://{id}")
}
