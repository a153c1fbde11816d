// ── Hardware address substitution ──

use crate::model::Directory;

/// Replace every occurrence of each known device address with the
/// device's name, then every known client address with its hostname.
///
/// Devices go first, so an address present in both directories reads as
/// the device.
pub fn substitute(message: &str, devices: &Directory, users: &Directory) -> String {
    devices
        .iter()
        .chain(users.iter())
        .fold(message.to_owned(), |text, (mac, name)| {
            if text.contains(mac) {
                text.replace(mac, name)
            } else {
                text
            }
        })
}
