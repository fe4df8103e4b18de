//! Song-link acceptance filter.

/// Returns true iff `url` contains any allow-list entry as a case-sensitive
/// substring.
///
/// This is a cheap acceptance filter, not a parsed-host check: a marker
/// appearing anywhere in the URL qualifies, so `myyoutube.fake.com` passes
/// with a `youtube` entry. False positives are absorbed downstream by the
/// matcher returning no result.
pub fn is_song_link(url: &str, hosts: &[String]) -> bool {
    hosts.iter().any(|host| url.contains(host.as_str()))
}
