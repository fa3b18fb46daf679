//! QR payload parsing.
//!
//! Scanned codes and pasted text arrive as arbitrary strings. Two shapes are
//! recognized, both carried as URI-like strings with query parameters (the
//! grammar is a stable contract with the poster/QR generator):
//!
//! - check-in: a link whose host or a path segment is `checkin`, carrying
//!   `gameId` or `parkId` (plus optional `courtId` and `queue`), e.g.
//!   `courthub://checkin?parkId=...&courtId=...&queue=true`
//! - invite: any payload carrying a `gameId` parameter without the check-in
//!   marker, e.g. `?gameId=...` or `https://courthub.app/join?gameId=...`
//!
//! Everything else parses to [`QrAction::Unknown`]. Parsing is total and
//! pure: no input panics or errors, the same input always yields the same
//! action.

use url::Url;

/// Parameters carried by a check-in payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckInParams {
    pub game_id: Option<String>,
    pub park_id: Option<String>,
    pub court_id: Option<String>,
    pub queue: Option<bool>,
}

/// A scanned payload decoded into a typed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrAction {
    /// Join a game and check in at its court.
    Invite { game_id: String },
    /// Check in at a park, optionally at a specific court.
    CheckIn(CheckInParams),
    /// Not a recognized payload; absence of a match is itself the result.
    Unknown,
}

/// Parses a raw scanned string into a [`QrAction`].
pub fn parse(raw: &str) -> QrAction {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return QrAction::Unknown;
    }

    let params = query_params(trimmed);
    let get = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };

    let game_id = get("gameId");
    let park_id = get("parkId");
    let court_id = get("courtId");
    let queue = get("queue").map(|v| matches!(v.as_str(), "1" | "true" | "yes"));

    if has_check_in_marker(trimmed) {
        if game_id.is_some() || park_id.is_some() {
            return QrAction::CheckIn(CheckInParams {
                game_id,
                park_id,
                court_id,
                queue,
            });
        }
        return QrAction::Unknown;
    }

    match game_id {
        Some(game_id) => QrAction::Invite { game_id },
        None => QrAction::Unknown,
    }
}

/// Extracts percent-decoded key/value pairs from the payload's query part.
///
/// Accepts full URIs, bare `?k=v` strings, and bare `k=v&k=v` strings.
fn query_params(payload: &str) -> Vec<(String, String)> {
    let query = match payload.split_once('?') {
        Some((_, query)) => query,
        // No '?': a bare pair list still counts if it looks like one.
        None if payload.contains('=') && !payload.contains('/') => payload,
        None => return Vec::new(),
    };

    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Whether the payload is a link addressed at the check-in flow.
fn has_check_in_marker(payload: &str) -> bool {
    let Ok(url) = Url::parse(payload) else {
        return false;
    };

    if url
        .host_str()
        .is_some_and(|h| h.eq_ignore_ascii_case("checkin"))
    {
        return true;
    }

    url.path()
        .split('/')
        .any(|segment| segment.eq_ignore_ascii_case("checkin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_query_game_id_is_invite() {
        assert_eq!(
            parse("?gameId=g1"),
            QrAction::Invite {
                game_id: "g1".to_string()
            }
        );
    }

    #[test]
    fn test_full_link_game_id_is_invite() {
        assert_eq!(
            parse("https://courthub.app/join?gameId=abc-123"),
            QrAction::Invite {
                game_id: "abc-123".to_string()
            }
        );
    }

    #[test]
    fn test_check_in_scheme_with_park_and_court() {
        let action = parse("courthub://checkin?parkId=p1&courtId=c1&queue=true");
        assert_eq!(
            action,
            QrAction::CheckIn(CheckInParams {
                game_id: None,
                park_id: Some("p1".to_string()),
                court_id: Some("c1".to_string()),
                queue: Some(true),
            })
        );
    }

    #[test]
    fn test_check_in_path_segment_with_game() {
        let action = parse("https://courthub.app/checkin?gameId=g9");
        assert_eq!(
            action,
            QrAction::CheckIn(CheckInParams {
                game_id: Some("g9".to_string()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_queue_flag_variants() {
        let parsed = |s: &str| match parse(s) {
            QrAction::CheckIn(params) => params.queue,
            other => panic!("expected check-in, got {:?}", other),
        };
        assert_eq!(parsed("courthub://checkin?parkId=p&queue=1"), Some(true));
        assert_eq!(parsed("courthub://checkin?parkId=p&queue=false"), Some(false));
        assert_eq!(parsed("courthub://checkin?parkId=p"), None);
    }

    #[test]
    fn test_check_in_marker_without_target_is_unknown() {
        assert_eq!(parse("courthub://checkin?queue=true"), QrAction::Unknown);
    }

    #[test]
    fn test_percent_decoding() {
        let action = parse("?gameId=g%2D1");
        assert_eq!(
            action,
            QrAction::Invite {
                game_id: "g-1".to_string()
            }
        );
    }

    #[test]
    fn test_unrecognized_inputs_are_unknown() {
        for raw in [
            "",
            "   ",
            "hello world",
            "https://example.com/menu",
            "WIFI:T:WPA;S:cafe;;",
            "?foo=bar",
            "gameId=",
        ] {
            assert_eq!(parse(raw), QrAction::Unknown, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_parse_is_total_over_awkward_strings() {
        // Never panics, always yields exactly one action.
        for raw in [
            "?????",
            "a=b&&&=c",
            "courthub://checkin",
            "%%%not-percent-encoded",
            "?gameId=%zz",
            "\u{0000}\u{FFFD}",
        ] {
            let _ = parse(raw);
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = "courthub://checkin?parkId=p1&courtId=c1";
        assert_eq!(parse(raw), parse(raw));
    }
}
